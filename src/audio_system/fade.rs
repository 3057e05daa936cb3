/// Fade scheduler
///
/// Linear volume (and optionally pan/pitch) ramps driven by a single tick
/// source. The host calls [`FadeScheduler::advance`] with the real time that
/// passed since the previous tick; every live job moves forward by that much.
///
/// A ramp always has [`FADE_STEPS`] discrete steps no matter how long it is.
/// Steps are `duration / FADE_STEPS` apart; step `k` is reached once `k` of
/// those intervals have elapsed and writes
/// `start + (target - start) * k / FADE_STEPS`. The last step writes the
/// exact target.
///
/// One job per identity: scheduling over a running job replaces it, keeping
/// a pending release so a fading stop is never lost. Each job
/// carries the [`ChannelToken`] of the channel it was started for and is
/// dropped without touching anything once that channel is gone.
use std::collections::HashMap;
use std::time::Duration;

use super::backend::PlaybackHandle;
use super::registry::{ChannelToken, TrackRegistry};
use super::source::{AudioCategory, ChannelId};

/// Number of discrete steps in every fade
pub const FADE_STEPS: u32 = 30;

/// Start and end value of one interpolated property
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub start: f32,
    pub target: f32,
}

impl Ramp {
    pub fn new(start: f32, target: f32) -> Self {
        Self { start, target }
    }

    /// Value at `step` (0..=FADE_STEPS)
    pub fn at(&self, step: u32) -> f32 {
        if step >= FADE_STEPS {
            return self.target;
        }
        self.start + (self.target - self.start) * (step as f32 / FADE_STEPS as f32)
    }
}

/// What happens to the channel when its fade finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeCompletion {
    /// Keep playing at the target
    Hold,

    /// Stop the handle and remove the channel from the registry
    Release,
}

/// An in-flight fade bound to one channel
#[derive(Debug, Clone)]
pub struct FadeJob {
    token: ChannelToken,
    volume: Ramp,
    pan: Option<Ramp>,
    pitch: Option<Ramp>,
    duration: Duration,
    elapsed: Duration,
    step: u32,
    completion: FadeCompletion,
}

impl FadeJob {
    /// Volume fade for the channel stamped with `token`
    pub fn new(token: ChannelToken, volume: Ramp, duration: Duration) -> Self {
        Self {
            token,
            volume,
            pan: None,
            pitch: None,
            duration,
            elapsed: Duration::ZERO,
            step: 0,
            completion: FadeCompletion::Hold,
        }
    }

    pub fn with_pan(mut self, pan: Ramp) -> Self {
        self.pan = Some(pan);
        self
    }

    pub fn with_pitch(mut self, pitch: Ramp) -> Self {
        self.pitch = Some(pitch);
        self
    }

    /// Release the channel once the ramp finishes
    pub fn releasing(mut self) -> Self {
        self.completion = FadeCompletion::Release;
        self
    }

    pub fn token(&self) -> ChannelToken {
        self.token
    }

    pub fn volume(&self) -> Ramp {
        self.volume
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn completion(&self) -> FadeCompletion {
        self.completion
    }

    /// Steps taken so far
    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.step >= FADE_STEPS
    }

    /// Step reached after `elapsed` of a `duration`-long fade
    fn step_at(duration: Duration, elapsed: Duration) -> u32 {
        let interval = (duration / FADE_STEPS).as_nanos();
        if interval == 0 {
            return FADE_STEPS;
        }
        (elapsed.as_nanos() / interval).min(u128::from(FADE_STEPS)) as u32
    }

    /// Write the values for the current step onto `handle`
    fn apply<H: PlaybackHandle>(&self, handle: &mut H) {
        handle.set_volume(self.volume.at(self.step));
        if let Some(pan) = self.pan {
            handle.set_pan(pan.at(self.step));
        }
        if let Some(pitch) = self.pitch {
            handle.set_pitch(pitch.at(self.step));
        }
    }

    /// Jump straight to the final step and write the targets
    pub fn finish<H: PlaybackHandle>(&mut self, handle: &mut H) {
        self.elapsed = self.duration;
        self.step = FADE_STEPS;
        self.apply(handle);
    }
}

/// Result of a job leaving the scheduler during [`FadeScheduler::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeOutcome {
    /// Reached its target; the channel keeps playing
    Completed { id: ChannelId },

    /// Reached its target; the channel was stopped and removed
    Released { id: ChannelId },

    /// The channel it belonged to was replaced or released first
    Superseded { id: ChannelId },
}

/// Owner of all in-flight fades
#[derive(Debug, Default)]
pub struct FadeScheduler {
    jobs: HashMap<ChannelId, FadeJob>,
}

impl FadeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `job` on `id`, returning the job it replaced (if any).
    ///
    /// A replaced job that was going to release the same channel passes that
    /// release on to `job`.
    pub fn schedule(&mut self, id: ChannelId, mut job: FadeJob) -> Option<FadeJob> {
        if self.releases(id, job.token) {
            job.completion = FadeCompletion::Release;
        }

        tracing::debug!(
            "Fading {}: {:.3} -> {:.3} over {:?}",
            id,
            job.volume.start,
            job.volume.target,
            job.duration
        );
        let replaced = self.jobs.insert(id, job);
        if replaced.is_some() {
            tracing::debug!("Replaced running fade on {}", id);
        }
        replaced
    }

    /// Whether a release is pending for the channel stamped with `token`
    pub fn releases(&self, id: ChannelId, token: ChannelToken) -> bool {
        self.jobs
            .get(&id)
            .is_some_and(|job| job.token == token && job.completion == FadeCompletion::Release)
    }

    pub fn cancel(&mut self, id: ChannelId) -> Option<FadeJob> {
        self.jobs.remove(&id)
    }

    /// Cancel every job under `category`, returning how many were dropped
    pub fn cancel_category(&mut self, category: AudioCategory) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|id, _| id.category != category);
        before - self.jobs.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.jobs.len();
        self.jobs.clear();
        count
    }

    pub fn job(&self, id: ChannelId) -> Option<&FadeJob> {
        self.jobs.get(&id)
    }

    pub fn is_fading(&self, id: ChannelId) -> bool {
        self.jobs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Move every job forward by `elapsed`.
    ///
    /// Values are only written when a job crosses into a new step, so a long
    /// tick that skips several steps produces one write at the latest step.
    pub fn advance<H: PlaybackHandle>(
        &mut self,
        elapsed: Duration,
        registry: &mut TrackRegistry<H>,
    ) -> Vec<FadeOutcome> {
        let mut outcomes = Vec::new();
        let mut released = Vec::new();

        self.jobs.retain(|&id, job| {
            let Some(channel) = registry
                .lookup_mut(id)
                .filter(|channel| channel.token() == job.token)
            else {
                tracing::debug!("Dropping fade for superseded channel {}", id);
                outcomes.push(FadeOutcome::Superseded { id });
                return false;
            };

            job.elapsed = job.elapsed.saturating_add(elapsed);
            let step = FadeJob::step_at(job.duration, job.elapsed);
            if step > job.step {
                job.step = step;
                job.apply(channel.handle_mut());
            }

            if !job.is_finished() {
                return true;
            }

            match job.completion {
                FadeCompletion::Hold => {
                    tracing::debug!("Volume fade complete: {}", id);
                    outcomes.push(FadeOutcome::Completed { id });
                }
                FadeCompletion::Release => {
                    channel.handle_mut().stop();
                    released.push(id);
                    tracing::debug!("Audio stopped after fadeout: {}", id);
                    outcomes.push(FadeOutcome::Released { id });
                }
            }
            false
        });

        for id in released {
            registry.remove(id);
        }

        outcomes
    }
}
