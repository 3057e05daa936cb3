/// Audio events
///
/// Events represent things that have happened (past tense).
/// They are broadcast to all subscribers.
use std::time::Duration;

use crate::audio_system::{ChannelId, HostEvent};

/// Notifications emitted by the audio system
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// A channel was bound and started playing
    ChannelStarted { channel: ChannelId, asset: String },

    /// A channel was stopped and removed from the registry
    ChannelStopped { channel: ChannelId },

    /// A fade began; `target` is linear volume
    FadeStarted {
        channel: ChannelId,
        target: f32,
        duration: Duration,
    },

    /// A fade reached its target
    FadeCompleted { channel: ChannelId },

    /// A fade was abandoned because its channel went away
    FadeSuperseded { channel: ChannelId },

    /// A text command was dropped
    CommandRejected { command: String, message: String },

    /// A host lifecycle event was applied
    HostEventHandled { event: HostEvent, stopped: usize },
}

impl AudioEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            AudioEvent::ChannelStarted { channel, asset } => {
                format!("Started {} on {}", asset, channel)
            }
            AudioEvent::ChannelStopped { channel } => format!("Stopped {}", channel),
            AudioEvent::FadeStarted {
                channel,
                target,
                duration,
            } => format!(
                "Fading {} to {:.0}% over {:.2}s",
                channel,
                target * 100.0,
                duration.as_secs_f32()
            ),
            AudioEvent::FadeCompleted { channel } => format!("Fade complete on {}", channel),
            AudioEvent::FadeSuperseded { channel } => {
                format!("Fade abandoned on {}", channel)
            }
            AudioEvent::CommandRejected { command, message } => {
                format!("Rejected {}: {}", command, message)
            }
            AudioEvent::HostEventHandled { event, stopped } => {
                format!("{}: stopped {} channel(s)", event.description(), stopped)
            }
        }
    }
}
