/// Live stereo pan for rodio sources
///
/// rodio sinks expose volume and speed but no balance control, so the pan is
/// applied inside the source chain. The pan value is shared with the owning
/// handle and can change while the source is playing.
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rodio::Source;

/// Pan value shared between a handle and its playing source
#[derive(Debug, Clone, Default)]
pub struct PanControl(Arc<AtomicU32>);

impl PanControl {
    pub fn new(pan: f32) -> Self {
        let control = Self::default();
        control.set(pan);
        control
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, pan: f32) {
        self.0.store(pan.to_bits(), Ordering::Relaxed);
    }

    /// Left/right gains for `pan`; the near side stays at unity
    pub fn gains(pan: f32) -> (f32, f32) {
        let pan = pan.clamp(-1.0, 1.0);
        ((1.0 - pan).min(1.0), (1.0 + pan).min(1.0))
    }
}

/// Source adapter that attenuates one side of a stereo stream.
///
/// Mono streams are widened to stereo so they can be panned too; streams with
/// more than two channels pass through untouched.
pub struct Panned<S> {
    inner: S,
    control: PanControl,
    channel: u16,
    pending_right: Option<i16>,
}

impl<S> Panned<S> {
    pub fn new(inner: S, control: PanControl) -> Self {
        Self {
            inner,
            control,
            channel: 0,
            pending_right: None,
        }
    }
}

fn scale(sample: i16, gain: f32) -> i16 {
    (sample as f32 * gain) as i16
}

impl<S> Iterator for Panned<S>
where
    S: Source<Item = i16>,
{
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        if let Some(right) = self.pending_right.take() {
            return Some(right);
        }

        let channels = self.inner.channels();
        let sample = self.inner.next()?;
        let (left, right) = PanControl::gains(self.control.get());

        match channels {
            1 => {
                self.pending_right = Some(scale(sample, right));
                Some(scale(sample, left))
            }
            2 => {
                let gain = if self.channel == 0 { left } else { right };
                self.channel = (self.channel + 1) % 2;
                Some(scale(sample, gain))
            }
            _ => Some(sample),
        }
    }
}

impl<S> Source for Panned<S>
where
    S: Source<Item = i16>,
{
    fn current_frame_len(&self) -> Option<usize> {
        let pending = usize::from(self.pending_right.is_some());
        self.inner.current_frame_len().map(|len| {
            if self.inner.channels() == 1 {
                len * 2 + pending
            } else {
                len + pending
            }
        })
    }

    fn channels(&self) -> u16 {
        match self.inner.channels() {
            1 => 2,
            n => n,
        }
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}
