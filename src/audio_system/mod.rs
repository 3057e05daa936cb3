pub mod backend;
pub mod fade;
pub mod lifecycle;
pub mod manager;
pub mod pan;
pub mod player;
pub mod recording;
pub mod registry;
/// Audio system module
///
/// Lets a host address an unbounded number of independent channels, each
/// identified by a category (BGM, BGS, ME, SE) and a track number:
/// - At most one live channel per identity (replace-on-play)
/// - Stepped volume/pan/pitch fades driven by one tick source
/// - Crossfades composed from a fade-in and a fade-out
///
/// ## Architecture
///
/// ```text
/// MultiTrackAudio
///   ├── TrackRegistry   (ChannelId -> Channel { handle, token })
///   ├── FadeScheduler   (ChannelId -> FadeJob, advanced by the host)
///   └── AudioBackend    (RodioBackend, RecordingBackend)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use audio_system::{AudioCategory, ChannelId, MultiTrackAudio, PlayRequest, RodioBackend};
///
/// let mut audio = MultiTrackAudio::new(RodioBackend::new("audio")?);
///
/// // Fade a BGS in on track 3
/// let rain = ChannelId::new(AudioCategory::Bgs, 3);
/// audio.play(rain, PlayRequest::new("Rain").with_fade_in(Duration::from_secs(2)))?;
///
/// // Host loop
/// audio.advance(frame_time);
/// ```
pub mod source;

// Re-export commonly used types
pub use backend::{AudioBackend, PlaybackHandle};
pub use fade::{FadeCompletion, FadeJob, FadeOutcome, FadeScheduler, Ramp, FADE_STEPS};
pub use lifecycle::{HostEvent, LifecyclePolicy, Scene, Teardown};
pub use manager::{FadeRequest, MultiTrackAudio, PlayRequest, DEFAULT_PITCH, DEFAULT_VOLUME};
pub use pan::{PanControl, Panned};
pub use player::{RodioBackend, RodioHandle};
pub use recording::{BackendCall, HandleState, RecordingBackend, RecordingHandle};
pub use registry::{Channel, ChannelToken, TrackRegistry};
pub use source::{AudioCategory, ChannelId};
