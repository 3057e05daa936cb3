/// Silent backend that records what it is asked to do
///
/// Used by the CLI's `--silent` mode and by tests. Handle state lives in a
/// shared table so it stays inspectable after the channel that owned the
/// handle has been released.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::BackendError;

use super::backend::{AudioBackend, PlaybackHandle};
use super::source::AudioCategory;

/// Backend call, in the order it was made
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Create {
        handle: usize,
        category: AudioCategory,
        asset: String,
    },
    Play {
        handle: usize,
        looping: bool,
    },
    Stop {
        handle: usize,
    },
}

/// Snapshot of a handle's settable properties
#[derive(Debug, Clone, PartialEq)]
pub struct HandleState {
    pub category: AudioCategory,
    pub asset: String,
    pub volume: f32,
    pub pan: f32,
    pub pitch: f32,
    pub playing: bool,
    pub looping: bool,
    /// Number of `set_volume` calls
    pub volume_writes: usize,
}

#[derive(Default)]
struct Shared {
    calls: Vec<BackendCall>,
    handles: HashMap<usize, HandleState>,
    next_handle: usize,
}

/// Recording backend; clones share the same log
#[derive(Clone, Default)]
pub struct RecordingBackend {
    shared: Arc<Mutex<Shared>>,
    missing: Arc<Mutex<HashSet<String>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `asset` fail to load, as if the file were absent
    pub fn with_missing_asset(self, asset: &str) -> Self {
        self.missing.lock().insert(asset.to_string());
        self
    }

    /// All calls made so far
    pub fn calls(&self) -> Vec<BackendCall> {
        self.shared.lock().calls.clone()
    }

    /// State of a handle, live or released
    pub fn handle_state(&self, handle: usize) -> Option<HandleState> {
        self.shared.lock().handles.get(&handle).cloned()
    }

    /// Number of handles created so far
    pub fn created_count(&self) -> usize {
        self.shared.lock().next_handle
    }

    /// Handles currently playing
    pub fn playing_count(&self) -> usize {
        self.shared
            .lock()
            .handles
            .values()
            .filter(|state| state.playing)
            .count()
    }
}

impl AudioBackend for RecordingBackend {
    type Handle = RecordingHandle;

    fn create_handle(
        &mut self,
        category: AudioCategory,
        asset: &str,
    ) -> Result<RecordingHandle, BackendError> {
        if self.missing.lock().contains(asset) {
            return Err(BackendError::NotFound {
                path: format!("{}/{}", category, asset),
            });
        }

        let mut shared = self.shared.lock();
        let id = shared.next_handle;
        shared.next_handle += 1;
        shared.calls.push(BackendCall::Create {
            handle: id,
            category,
            asset: asset.to_string(),
        });
        shared.handles.insert(
            id,
            HandleState {
                category,
                asset: asset.to_string(),
                volume: 1.0,
                pan: 0.0,
                pitch: 1.0,
                playing: false,
                looping: false,
                volume_writes: 0,
            },
        );

        Ok(RecordingHandle {
            id,
            shared: Arc::clone(&self.shared),
        })
    }
}

/// Handle issued by [`RecordingBackend`]
pub struct RecordingHandle {
    id: usize,
    shared: Arc<Mutex<Shared>>,
}

impl RecordingHandle {
    /// Backend-wide handle number
    pub fn id(&self) -> usize {
        self.id
    }

    fn read<T: Default>(&self, f: impl FnOnce(&HandleState) -> T) -> T {
        self.shared
            .lock()
            .handles
            .get(&self.id)
            .map(f)
            .unwrap_or_default()
    }

    fn write(&self, f: impl FnOnce(&mut HandleState)) {
        if let Some(state) = self.shared.lock().handles.get_mut(&self.id) {
            f(state);
        }
    }
}

impl PlaybackHandle for RecordingHandle {
    fn volume(&self) -> f32 {
        self.read(|s| s.volume)
    }

    fn set_volume(&mut self, volume: f32) {
        self.write(|s| {
            s.volume = volume;
            s.volume_writes += 1;
        });
    }

    fn pan(&self) -> f32 {
        self.read(|s| s.pan)
    }

    fn set_pan(&mut self, pan: f32) {
        self.write(|s| s.pan = pan);
    }

    fn pitch(&self) -> f32 {
        self.read(|s| s.pitch)
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.write(|s| s.pitch = pitch);
    }

    fn play(&mut self, looping: bool) {
        self.write(|s| {
            s.playing = true;
            s.looping = looping;
        });
        self.shared.lock().calls.push(BackendCall::Play {
            handle: self.id,
            looping,
        });
    }

    fn stop(&mut self) {
        self.write(|s| s.playing = false);
        self.shared
            .lock()
            .calls
            .push(BackendCall::Stop { handle: self.id });
    }
}
