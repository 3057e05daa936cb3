use thiserror::Error;

use crate::audio_system::{AudioCategory, ChannelId};

/// Errors raised while decoding or executing channel commands.
///
/// None of these are fatal to the host. The dispatcher reports them and
/// skips the triggering command.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Invalid audio type: {0}. Expected one of 'bgm', 'bgs', 'me', or 'se'")]
    UnknownCategory(String),

    #[error("No active channel at {0}")]
    ChannelNotFound(ChannelId),

    #[error("Malformed crossfade target: {0:?}")]
    MalformedCrossfadeTarget(String),

    #[error("Invalid track number: {0}")]
    InvalidTrackNumber(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidArgument { name: &'static str, value: String },

    #[error("Audio asset unavailable: {category}/{asset}")]
    AssetUnavailable {
        category: AudioCategory,
        asset: String,
        #[source]
        source: BackendError,
    },
}

impl AudioError {
    /// Lookup misses are expected in normal play and only warrant a warning
    pub fn is_warning(&self) -> bool {
        matches!(self, AudioError::ChannelNotFound(_))
    }
}

/// Failures inside an audio backend while creating a playback handle
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Audio file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read audio file")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode audio format")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("Failed to initialize audio output stream")]
    StreamInit(#[from] rodio::StreamError),

    #[error("Failed to create audio sink")]
    Sink(#[from] rodio::PlayError),

    #[error("Asset rejected by backend: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to create config directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
