/// Audio categories and channel identities
///
/// Every channel is addressed by a category plus a track number, so any
/// number of tracks of the same category can play simultaneously.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AudioError;

/// Audio categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCategory {
    /// Background music
    Bgm,

    /// Background sound (ambiance loops)
    Bgs,

    /// Musical effect (jingles)
    Me,

    /// Sound effect
    Se,
}

impl AudioCategory {
    /// All categories, in command-token order
    pub const ALL: [AudioCategory; 4] = [
        AudioCategory::Bgm,
        AudioCategory::Bgs,
        AudioCategory::Me,
        AudioCategory::Se,
    ];

    /// Command token and asset folder name
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCategory::Bgm => "bgm",
            AudioCategory::Bgs => "bgs",
            AudioCategory::Me => "me",
            AudioCategory::Se => "se",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            AudioCategory::Bgm => "Background Music",
            AudioCategory::Bgs => "Background Sound",
            AudioCategory::Me => "Music Effect",
            AudioCategory::Se => "Sound Effect",
        }
    }
}

impl fmt::Display for AudioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioCategory {
    type Err = AudioError;

    /// Case-insensitive; anything outside the four tokens is `UnknownCategory`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bgm" => Ok(AudioCategory::Bgm),
            "bgs" => Ok(AudioCategory::Bgs),
            "me" => Ok(AudioCategory::Me),
            "se" => Ok(AudioCategory::Se),
            _ => Err(AudioError::UnknownCategory(s.to_string())),
        }
    }
}

/// Identity of a channel: (category, track number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId {
    pub category: AudioCategory,
    pub track: u32,
}

impl ChannelId {
    /// Track used when a command omits the number
    pub const DEFAULT_TRACK: u32 = 1;

    pub fn new(category: AudioCategory, track: u32) -> Self {
        Self { category, track }
    }

    /// Channel on the default track of `category`
    pub fn first(category: AudioCategory) -> Self {
        Self::new(category, Self::DEFAULT_TRACK)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.category, self.track)
    }
}
