/// rodio playback backend
///
/// Assets are read from `<audio_root>/<category>/<name>`. Names without an
/// extension are probed against the formats rodio can decode.
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::BackendError;

use super::backend::{AudioBackend, PlaybackHandle};
use super::pan::{PanControl, Panned};
use super::source::AudioCategory;

/// Extensions tried, in order, for assets named without one
const EXTENSIONS: [&str; 5] = ["ogg", "m4a", "mp3", "wav", "flac"];

/// Backend that renders channels through the default output device
pub struct RodioBackend {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    audio_root: PathBuf,
}

impl RodioBackend {
    /// Open the default output device
    pub fn new(audio_root: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let (stream, stream_handle) = OutputStream::try_default()?;
        let audio_root = audio_root.into();
        tracing::info!("Audio output ready, assets under {}", audio_root.display());

        Ok(Self {
            _stream: stream,
            stream_handle,
            audio_root,
        })
    }

    pub fn audio_root(&self) -> &Path {
        &self.audio_root
    }

    /// Locate the file for `asset` under `category`
    pub fn resolve(&self, category: AudioCategory, asset: &str) -> Result<PathBuf, BackendError> {
        resolve_asset(&self.audio_root, category, asset)
    }
}

fn resolve_asset(root: &Path, category: AudioCategory, asset: &str) -> Result<PathBuf, BackendError> {
    let base = root.join(category.as_str()).join(asset);
    if base.extension().is_some() && base.is_file() {
        return Ok(base);
    }

    EXTENSIONS
        .iter()
        .map(|ext| {
            let mut name = base.clone().into_os_string();
            name.push(".");
            name.push(ext);
            PathBuf::from(name)
        })
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| BackendError::NotFound {
            path: base.display().to_string(),
        })
}

impl AudioBackend for RodioBackend {
    type Handle = RodioHandle;

    fn create_handle(
        &mut self,
        category: AudioCategory,
        asset: &str,
    ) -> Result<RodioHandle, BackendError> {
        let path = self.resolve(category, asset)?;
        let audio_data = Arc::new(std::fs::read(&path)?);

        // Verify the audio can be decoded before handing out a handle
        Decoder::new(Cursor::new((*audio_data).clone()))?;

        let sink = Sink::try_new(&self.stream_handle)?;
        sink.pause();

        tracing::debug!(
            "Created handle for {}/{} ({} bytes)",
            category,
            asset,
            audio_data.len()
        );

        Ok(RodioHandle {
            sink,
            audio_data,
            pan: PanControl::default(),
            started: false,
        })
    }
}

/// One sink per channel
pub struct RodioHandle {
    sink: Sink,
    audio_data: Arc<Vec<u8>>,
    pan: PanControl,
    started: bool,
}

impl RodioHandle {
    fn append_source(&mut self, looping: bool) -> Result<(), BackendError> {
        // rodio's Decoder needs owned data with a 'static lifetime
        let cursor = Cursor::new((*self.audio_data).clone());
        let source: Box<dyn Source<Item = i16> + Send> = if looping {
            Box::new(Decoder::new_looped(cursor)?)
        } else {
            Box::new(Decoder::new(cursor)?)
        };

        self.sink.append(Panned::new(source, self.pan.clone()));
        Ok(())
    }
}

impl PlaybackHandle for RodioHandle {
    fn volume(&self) -> f32 {
        self.sink.volume()
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume.max(0.0));
    }

    fn pan(&self) -> f32 {
        self.pan.get()
    }

    fn set_pan(&mut self, pan: f32) {
        self.pan.set(pan);
    }

    fn pitch(&self) -> f32 {
        self.sink.speed()
    }

    fn set_pitch(&mut self, pitch: f32) {
        if pitch > 0.0 {
            self.sink.set_speed(pitch);
        }
    }

    fn play(&mut self, looping: bool) {
        if !self.started {
            if let Err(e) = self.append_source(looping) {
                tracing::error!("Failed to start playback: {}", e);
                return;
            }
            self.started = true;
        }
        self.sink.play();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("multitrack-audio-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(root.join("bgm")).unwrap();
        root
    }

    #[test]
    fn test_resolve_probes_extensions() {
        let root = scratch_root("probe");
        std::fs::write(root.join("bgm").join("Theme.mp3"), b"").unwrap();

        let path = resolve_asset(&root, AudioCategory::Bgm, "Theme").unwrap();
        assert_eq!(path, root.join("bgm").join("Theme.mp3"));

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_resolve_keeps_explicit_extension() {
        let root = scratch_root("explicit");
        std::fs::write(root.join("bgm").join("Title Music.wav"), b"").unwrap();

        let path = resolve_asset(&root, AudioCategory::Bgm, "Title Music.wav").unwrap();
        assert_eq!(path, root.join("bgm").join("Title Music.wav"));

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_resolve_missing_asset() {
        let root = scratch_root("missing");
        let result = resolve_asset(&root, AudioCategory::Bgm, "Nowhere");
        assert!(matches!(result, Err(BackendError::NotFound { .. })));

        std::fs::remove_dir_all(&root).ok();
    }
}
