use anyhow::{Context, Result};
use clap::Parser;
use std::io::BufRead;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use multitrack_audio::audio_system::{AudioBackend, MultiTrackAudio, RecordingBackend, RodioBackend};
use multitrack_audio::cli::Args;
use multitrack_audio::config::Config;
use multitrack_audio::messaging::{CommandExecutor, EventBus, Request};
use tracing_subscriber::{reload, EnvFilter, Registry};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// `RUST_LOG` wins over the `debug` flag
fn log_filter(debug: bool) -> EnvFilter {
    let default_level = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize tracing with file rotation
///
/// Logs go to stderr and to a daily file under the platform config
/// directory (`MultiTrackAudio/logs/multitrack-audio.YYYY-MM-DD.log`).
/// The returned handle swaps the filter once the config file is read.
fn initialize_tracing(debug: bool) -> FilterHandle {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*};

    let log_dir = Config::log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "multitrack-audio.log");
    let (filter, handle) = reload::Layer::new(log_filter(debug));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Log directory: {}", log_dir.display());
    handle
}

/// Forward stdin lines to the executor. `wait <seconds>` pauses the reader
/// so scripted input can let fades run; EOF shuts the executor down.
fn spawn_stdin_reader(tx: Sender<Request>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };

            if let Some(seconds) = line.trim().strip_prefix("wait ") {
                match seconds.trim().parse::<f32>().map(Duration::try_from_secs_f32) {
                    Ok(Ok(pause)) => thread::sleep(pause),
                    _ => tracing::warn!("Invalid wait duration: {}", seconds),
                }
                continue;
            }

            let Some(request) = Request::parse(&line) else {
                continue;
            };
            let shutdown = request == Request::Shutdown;
            if tx.send(request).is_err() || shutdown {
                return;
            }
        }
        let _ = tx.send(Request::Shutdown);
    });
}

fn run<B: AudioBackend>(audio: MultiTrackAudio<B>, config: &Config, bus: &EventBus) {
    let (rx, _id) = bus.subscribe();
    thread::spawn(move || {
        for event in rx.iter() {
            println!("{}", event.description());
        }
    });

    let mut audio = audio.with_event_bus(bus.clone()).with_policy(config.lifecycle.clone());
    let executor = CommandExecutor::new(config.tick_interval());
    spawn_stdin_reader(executor.sender());
    executor.run(&mut audio);
}

fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("Failed to load config from {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = initialize_tracing(args.debug);

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = load_config(&config_path)?;
    if let Some(root) = args.audio_root {
        config.audio_root = root;
    }
    if config.debug_logs && !args.debug {
        if let Err(e) = filter.reload(log_filter(true)) {
            tracing::warn!("Failed to enable debug logs: {}", e);
        }
    }
    tracing::info!(
        "Starting multitrack-audio v{} (config {})",
        env!("CARGO_PKG_VERSION"),
        config_path.display()
    );

    let bus = EventBus::new();
    if args.silent {
        tracing::info!("Silent mode: backend calls are recorded, not played");
        run(MultiTrackAudio::new(RecordingBackend::new()), &config, &bus);
    } else {
        let backend = RodioBackend::new(&config.audio_root)
            .context("Failed to open the default audio output device")?;
        tracing::info!("Audio root: {}", backend.audio_root().display());
        run(MultiTrackAudio::new(backend), &config, &bus);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::Layer;

    fn max_level(filter: &EnvFilter) -> Option<LevelFilter> {
        <EnvFilter as Layer<Registry>>::max_level_hint(filter)
    }

    #[test]
    fn test_log_filter_levels() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(max_level(&log_filter(false)), Some(LevelFilter::INFO));
        assert_eq!(max_level(&log_filter(true)), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_filter_reload_enables_debug() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let (layer, handle) = reload::Layer::<EnvFilter, Registry>::new(log_filter(false));
        handle.reload(log_filter(true)).unwrap();
        handle
            .with_current(|filter| assert_eq!(max_level(filter), Some(LevelFilter::DEBUG)))
            .unwrap();
        drop(layer);
    }
}
