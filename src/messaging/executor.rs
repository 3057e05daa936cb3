/// Command executor
///
/// Owns the tick loop: drains queued requests, dispatches them to the audio
/// manager and advances fades by the wall-clock time between iterations.
/// Runs on the thread that owns the audio output.
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::audio_system::{AudioBackend, HostEvent, MultiTrackAudio, Scene};

use super::dispatcher::{dispatch_line, CommandResult};

/// Work submitted to the executor
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// A host text command line, e.g. `play-bgm2 Theme 80`
    Command(String),

    /// A host lifecycle notification
    Host(HostEvent),

    /// Stop everything and leave the loop
    Shutdown,
}

impl Request {
    /// Parse a control line. Blank lines and `#` comments yield `None`.
    ///
    /// ```text
    /// quit | exit
    /// host new-game | load-game | title | battle
    /// <anything else is a command line>
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        match line.to_ascii_lowercase().as_str() {
            "quit" | "exit" => return Some(Request::Shutdown),
            "host new-game" => return Some(Request::Host(HostEvent::NewGame)),
            "host load-game" => return Some(Request::Host(HostEvent::GameLoaded)),
            "host title" => return Some(Request::Host(HostEvent::TitleEntered)),
            "host battle" => {
                return Some(Request::Host(HostEvent::SceneChanged {
                    from: Scene::Map,
                    to: Scene::Battle,
                }))
            }
            _ => {}
        }

        Some(Request::Command(line.to_string()))
    }
}

/// Command executor that processes requests and drives fades
pub struct CommandExecutor {
    request_tx: Sender<Request>,
    request_rx: Receiver<Request>,
    tick: Duration,
}

impl CommandExecutor {
    /// Create an executor that ticks at least every `tick`
    pub fn new(tick: Duration) -> Self {
        let (tx, rx) = unbounded();

        Self {
            request_tx: tx,
            request_rx: rx,
            tick,
        }
    }

    /// Get a sender for submitting requests
    pub fn sender(&self) -> Sender<Request> {
        self.request_tx.clone()
    }

    /// Queue a request
    pub fn execute(&self, request: Request) {
        let _ = self.request_tx.send(request);
    }

    /// Apply one request; returns false when the loop should stop
    pub fn handle<B: AudioBackend>(&self, audio: &mut MultiTrackAudio<B>, request: Request) -> bool {
        match request {
            Request::Command(line) => {
                if let CommandResult::Ignored = dispatch_line(audio, &line) {
                    tracing::debug!("Ignoring unrecognized command: {}", line);
                }
                true
            }
            Request::Host(event) => {
                audio.notify(event);
                true
            }
            Request::Shutdown => {
                tracing::info!("Shutdown requested, stopping all channels");
                audio.stop_all();
                false
            }
        }
    }

    /// Process requests until shutdown or until every sender is gone
    pub fn run<B: AudioBackend>(&self, audio: &mut MultiTrackAudio<B>) {
        tracing::info!("Command executor started (tick {:?})", self.tick);
        let mut last_tick = Instant::now();

        loop {
            let running = match self.request_rx.recv_timeout(self.tick) {
                Ok(request) => self.handle(audio, request),
                Err(RecvTimeoutError::Timeout) => true,
                Err(RecvTimeoutError::Disconnected) => {
                    audio.stop_all();
                    false
                }
            };

            let now = Instant::now();
            audio.advance(now.duration_since(last_tick));
            last_tick = now;

            if !running {
                break;
            }
        }

        tracing::info!("Command executor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::{AudioCategory, ChannelId, RecordingBackend};

    #[test]
    fn test_request_parse() {
        assert_eq!(Request::parse("  quit "), Some(Request::Shutdown));
        assert_eq!(Request::parse("EXIT"), Some(Request::Shutdown));
        assert_eq!(
            Request::parse("host load-game"),
            Some(Request::Host(HostEvent::GameLoaded))
        );
        assert_eq!(
            Request::parse("play-bgm Theme"),
            Some(Request::Command("play-bgm Theme".to_string()))
        );
        assert_eq!(Request::parse("# comment"), None);
        assert_eq!(Request::parse("   "), None);
    }

    #[test]
    fn test_executor_sender() {
        let executor = CommandExecutor::new(Duration::from_millis(16));
        assert!(executor.sender().send(Request::Shutdown).is_ok());
    }

    #[test]
    fn test_handle_host_event() {
        let executor = CommandExecutor::new(Duration::from_millis(16));
        let mut audio = MultiTrackAudio::new(RecordingBackend::new());

        assert!(executor.handle(&mut audio, Request::Command("play-bgs3 Rain".to_string())));
        assert!(audio.is_active(ChannelId::new(AudioCategory::Bgs, 3)));

        assert!(executor.handle(&mut audio, Request::Host(HostEvent::TitleEntered)));
        assert_eq!(audio.active_count(), 0);
    }

    #[test]
    fn test_run_until_shutdown() {
        let executor = CommandExecutor::new(Duration::from_millis(1));
        let mut audio = MultiTrackAudio::new(RecordingBackend::new());

        executor.execute(Request::Command("play-bgm Theme".to_string()));
        executor.execute(Request::Command("play-se4 Click".to_string()));
        executor.execute(Request::Shutdown);
        executor.run(&mut audio);

        assert_eq!(audio.active_count(), 0);
        assert_eq!(audio.backend().created_count(), 2);
        assert_eq!(audio.backend().playing_count(), 0);
    }
}
