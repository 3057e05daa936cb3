//! Multi-track audio overlay.
//!
//! Lets a host address any number of BGM, BGS, ME and SE channels by
//! `(category, track)` through text commands such as
//! `play-bgm2 "Title Music" 90 3` or `crossfade-bgm2 bgm3 Scene2 5`.

pub mod audio_system;
pub mod cli;
pub mod config;
pub mod error;
pub mod messaging;

pub use audio_system::{
    AudioBackend, AudioCategory, ChannelId, FadeRequest, MultiTrackAudio, PlayRequest,
    RecordingBackend, RodioBackend,
};
pub use config::Config;
pub use error::{AudioError, BackendError, ConfigError};
pub use messaging::{dispatch, dispatch_line, Command, CommandExecutor, CommandResult, Request};
