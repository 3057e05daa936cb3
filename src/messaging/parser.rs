/// Text command parser
///
/// ```text
/// command     := action "-" category trackNumber?
/// action      := "play" | "stop" | "fade" | "crossfade"
/// category    := "bgm" | "bgs" | "me" | "se"
/// trackNumber := digit+        (1 when omitted)
/// ```
///
/// Action and category are case-insensitive. Arguments are whitespace
/// separated; a double-quoted run keeps its spaces and loses its quotes.
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

use crate::audio_system::{
    AudioCategory, ChannelId, FadeRequest, PlayRequest, DEFAULT_PITCH, DEFAULT_VOLUME,
};
use crate::error::AudioError;

use super::commands::{Action, Command, DEFAULT_CROSSFADE_SECONDS};

fn command_head() -> &'static Regex {
    static HEAD: OnceLock<Regex> = OnceLock::new();
    HEAD.get_or_init(|| {
        Regex::new(r"(?i)^(play|stop|fade|crossfade)-([a-z]+)(\d*)$")
            .expect("command head pattern is valid")
    })
}

fn channel_token() -> &'static Regex {
    static CHANNEL: OnceLock<Regex> = OnceLock::new();
    CHANNEL.get_or_init(|| {
        Regex::new(r"(?i)^([a-z]+)(\d*)$").expect("channel pattern is valid")
    })
}

fn argument() -> &'static Regex {
    static ARGUMENT: OnceLock<Regex> = OnceLock::new();
    ARGUMENT.get_or_init(|| Regex::new(r#""([^"]+)"|(\S+)"#).expect("argument pattern is valid"))
}

/// Split an argument string into tokens, honouring double quotes
pub fn parse_arguments(args: &str) -> Vec<String> {
    argument()
        .captures_iter(args)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Build a channel identity from a category token and optional track digits
pub fn parse_channel(category: &str, track: &str) -> Result<ChannelId, AudioError> {
    let category: AudioCategory = category.parse()?;
    if track.is_empty() {
        return Ok(ChannelId::first(category));
    }

    match track.parse::<u32>() {
        Ok(0) | Err(_) => Err(AudioError::InvalidTrackNumber(track.to_string())),
        Ok(track) => Ok(ChannelId::new(category, track)),
    }
}

/// Parse a nested `<category><track>` token such as `bgm3`
pub fn parse_channel_token(token: &str) -> Result<ChannelId, AudioError> {
    let malformed = || AudioError::MalformedCrossfadeTarget(token.to_string());
    let caps = channel_token().captures(token).ok_or_else(malformed)?;
    parse_channel(&caps[1], &caps[2]).map_err(|_| malformed())
}

/// Parse a command head and its argument string.
///
/// `Ok(None)` means the head is not one of ours and should be passed over
/// silently.
pub fn parse_command(head: &str, args: &str) -> Result<Option<Command>, AudioError> {
    let Some(caps) = command_head().captures(head.trim()) else {
        return Ok(None);
    };
    let Some(action) = Action::from_token(&caps[1]) else {
        return Ok(None);
    };
    let channel = parse_channel(&caps[2], &caps[3])?;
    let args = Arguments(parse_arguments(args));

    let command = match action {
        Action::Play => Command::Play {
            channel,
            request: PlayRequest::new(args.required(0, "name")?)
                .with_volume(args.number(1, "volume", DEFAULT_VOLUME)?)
                .with_fade_in(args.seconds(2, "fadein", 0.0)?)
                .with_pan(args.number(3, "pan", 0.0)?)
                .with_pitch(args.number(4, "pitch", DEFAULT_PITCH)?),
        },
        Action::Stop => Command::Stop {
            channel,
            fade_out: args.seconds(0, "fadeout", 0.0)?,
        },
        Action::Fade => {
            let mut request = FadeRequest::new(
                args.number(0, "volume", 0.0)?,
                args.seconds(1, "duration", 0.0)?,
            );
            request.pan = args.optional_number(2, "pan")?;
            request.pitch = args.optional_number(3, "pitch")?;
            Command::Fade { channel, request }
        }
        Action::Crossfade => {
            let target = args
                .get(0)
                .ok_or_else(|| AudioError::MalformedCrossfadeTarget(String::new()))?;
            Command::Crossfade {
                from: channel,
                to: parse_channel_token(target)?,
                asset: args.required(1, "name")?,
                duration: args.seconds(2, "duration", DEFAULT_CROSSFADE_SECONDS)?,
            }
        }
    };

    Ok(Some(command))
}

/// Positional argument list
struct Arguments(Vec<String>);

impl Arguments {
    fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    fn required(&self, index: usize, name: &'static str) -> Result<String, AudioError> {
        self.get(index)
            .map(str::to_string)
            .ok_or(AudioError::MissingArgument(name))
    }

    fn optional_number(&self, index: usize, name: &'static str) -> Result<Option<f32>, AudioError> {
        let Some(token) = self.get(index) else {
            return Ok(None);
        };
        match token.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => Err(AudioError::InvalidArgument {
                name,
                value: token.to_string(),
            }),
        }
    }

    fn number(&self, index: usize, name: &'static str, default: f32) -> Result<f32, AudioError> {
        Ok(self.optional_number(index, name)?.unwrap_or(default))
    }

    fn seconds(&self, index: usize, name: &'static str, default: f32) -> Result<Duration, AudioError> {
        let seconds = self.number(index, name, default)?;
        Duration::try_from_secs_f32(seconds).map_err(|_| AudioError::InvalidArgument {
            name,
            value: self.get(index).unwrap_or_default().to_string(),
        })
    }
}
