/// Audio backend seam
///
/// The backend decodes and renders named assets. This crate never touches
/// samples itself; it only drives the handles a backend hands out.
use crate::error::BackendError;

use super::source::AudioCategory;

/// A playback handle owned by exactly one channel.
///
/// Volume is linear (1.0 = unity), pan runs from -1.0 (left) to 1.0 (right),
/// pitch is a playback-rate multiplier. Calls must be safe to repeat:
/// stopping an already stopped handle is a no-op.
pub trait PlaybackHandle {
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);

    fn pan(&self) -> f32;
    fn set_pan(&mut self, pan: f32);

    fn pitch(&self) -> f32;
    fn set_pitch(&mut self, pitch: f32);

    /// Start (or resume) playback
    fn play(&mut self, looping: bool);

    /// Stop playback and release whatever the backend holds for this handle
    fn stop(&mut self);
}

/// Factory for playback handles
pub trait AudioBackend {
    type Handle: PlaybackHandle;

    /// Create a handle for `asset` under `category`, volume at its default
    fn create_handle(
        &mut self,
        category: AudioCategory,
        asset: &str,
    ) -> Result<Self::Handle, BackendError>;
}
