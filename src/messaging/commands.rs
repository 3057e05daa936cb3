/// Command types
///
/// One typed variant per text action, with every optional field already
/// defaulted and coerced by the parser.
use std::fmt;
use std::time::Duration;

use crate::audio_system::{ChannelId, FadeRequest, PlayRequest};

/// Crossfade duration, in seconds, when the command omits it.
///
/// Every other duration defaults to zero; this one has always been 120 and
/// is kept as-is even though it reads like a leftover percentage.
pub const DEFAULT_CROSSFADE_SECONDS: f32 = 120.0;

/// Text command actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Play,
    Stop,
    Fade,
    Crossfade,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Play => "play",
            Action::Stop => "stop",
            Action::Fade => "fade",
            Action::Crossfade => "crossfade",
        }
    }

    /// Case-insensitive match of an action token
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "play" => Some(Action::Play),
            "stop" => Some(Action::Stop),
            "fade" => Some(Action::Fade),
            "crossfade" => Some(Action::Crossfade),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `play-<cat><n> name [volume] [fadein] [pan] [pitch]`
    Play {
        channel: ChannelId,
        request: PlayRequest,
    },

    /// `stop-<cat><n> [fadeout]`
    Stop {
        channel: ChannelId,
        fade_out: Duration,
    },

    /// `fade-<cat><n> [volume] [duration] [pan] [pitch]`
    Fade {
        channel: ChannelId,
        request: FadeRequest,
    },

    /// `crossfade-<cat><n> <cat><n> name [duration]`
    Crossfade {
        from: ChannelId,
        to: ChannelId,
        asset: String,
        duration: Duration,
    },
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Command::Play { .. } => Action::Play,
            Command::Stop { .. } => Action::Stop,
            Command::Fade { .. } => Action::Fade,
            Command::Crossfade { .. } => Action::Crossfade,
        }
    }

    /// Channel named in the command head
    pub fn channel(&self) -> ChannelId {
        match self {
            Command::Play { channel, .. }
            | Command::Stop { channel, .. }
            | Command::Fade { channel, .. } => *channel,
            Command::Crossfade { from, .. } => *from,
        }
    }

    /// Get a human-readable description of the command
    pub fn description(&self) -> String {
        match self {
            Command::Play { channel, request } => format!(
                "Play {} on {} at {}%",
                request.asset, channel, request.volume
            ),
            Command::Stop { channel, fade_out } => {
                if fade_out.is_zero() {
                    format!("Stop {}", channel)
                } else {
                    format!("Stop {} over {:.2}s", channel, fade_out.as_secs_f32())
                }
            }
            Command::Fade { channel, request } => format!(
                "Fade {} to {}% over {:.2}s",
                channel,
                request.volume,
                request.duration.as_secs_f32()
            ),
            Command::Crossfade {
                from,
                to,
                asset,
                duration,
            } => format!(
                "Crossfade {} -> {} ({}) over {:.2}s",
                from,
                to,
                asset,
                duration.as_secs_f32()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::AudioCategory;

    #[test]
    fn test_action_tokens() {
        assert_eq!(Action::from_token("CrossFade"), Some(Action::Crossfade));
        assert_eq!(Action::from_token("PLAY"), Some(Action::Play));
        assert_eq!(Action::from_token("pause"), None);
        assert_eq!(Action::Stop.to_string(), "stop");
    }

    #[test]
    fn test_command_description() {
        let channel = ChannelId::new(AudioCategory::Bgm, 2);

        let cmd = Command::Stop {
            channel,
            fade_out: Duration::ZERO,
        };
        assert_eq!(cmd.description(), "Stop bgm2");
        assert_eq!(cmd.action(), Action::Stop);

        let cmd = Command::Crossfade {
            from: channel,
            to: ChannelId::new(AudioCategory::Bgm, 3),
            asset: "Scene2".to_string(),
            duration: Duration::from_secs(5),
        };
        assert_eq!(cmd.description(), "Crossfade bgm2 -> bgm3 (Scene2) over 5.00s");
        assert_eq!(cmd.channel(), channel);
    }
}
