/// Command dispatcher
///
/// Routes host text commands to the audio manager. Nothing here propagates
/// a failure back to the host: rejected commands are logged and published
/// so the host keeps running.
use crate::audio_system::{AudioBackend, MultiTrackAudio};
use crate::error::AudioError;

use super::commands::Command;
use super::events::AudioEvent;
use super::parser::parse_command;

/// Result of dispatching one host command
#[derive(Debug)]
pub enum CommandResult {
    /// The command was ours and ran
    Executed(Command),

    /// The command belongs to someone else
    Ignored,

    /// The command was ours but could not be parsed or run
    Rejected(AudioError),
}

impl CommandResult {
    pub fn is_executed(&self) -> bool {
        matches!(self, CommandResult::Executed(_))
    }
}

/// Run one host command
pub fn execute<B: AudioBackend>(
    audio: &mut MultiTrackAudio<B>,
    command: &Command,
) -> Result<(), AudioError> {
    tracing::debug!("Executing command: {}", command.description());

    match command {
        Command::Play { channel, request } => audio.play(*channel, request.clone()).map(|_| ()),
        Command::Stop { channel, fade_out } => audio.stop(*channel, *fade_out),
        Command::Fade { channel, request } => audio.fade(*channel, request.clone()),
        Command::Crossfade {
            from,
            to,
            asset,
            duration,
        } => audio.crossfade(*from, *to, asset, *duration),
    }
}

/// Parse and run `command` with its raw argument string
pub fn dispatch<B: AudioBackend>(
    audio: &mut MultiTrackAudio<B>,
    command: &str,
    args: &str,
) -> CommandResult {
    let outcome = parse_command(command, args).and_then(|parsed| match parsed {
        Some(parsed) => execute(audio, &parsed).map(|_| Some(parsed)),
        None => Ok(None),
    });

    match outcome {
        Ok(Some(parsed)) => CommandResult::Executed(parsed),
        Ok(None) => CommandResult::Ignored,
        Err(e) => {
            if e.is_warning() {
                tracing::warn!("{} {}: {}", command, args, e);
            } else {
                tracing::error!("{} {}: {}", command, args, e);
            }
            audio.publish(AudioEvent::CommandRejected {
                command: command.to_string(),
                message: e.to_string(),
            });
            CommandResult::Rejected(e)
        }
    }
}

/// Split a full command line on its first whitespace and dispatch it
pub fn dispatch_line<B: AudioBackend>(audio: &mut MultiTrackAudio<B>, line: &str) -> CommandResult {
    let line = line.trim();
    let (command, args) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));
    dispatch(audio, command, args.trim_start())
}
