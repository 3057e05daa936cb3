/// Multi-track audio manager
///
/// Owns the registry and the fade scheduler and drives the backend. One
/// instance per session; `stop_all` is its teardown.
use std::time::Duration;

use crate::error::AudioError;
use crate::messaging::{AudioEvent, EventBus};

use super::backend::{AudioBackend, PlaybackHandle};
use super::fade::{FadeJob, FadeOutcome, FadeScheduler, Ramp};
use super::lifecycle::{HostEvent, LifecyclePolicy, Scene, Teardown};
use super::registry::{Channel, ChannelToken, TrackRegistry};
use super::source::{AudioCategory, ChannelId};

/// Volume percent used when a play omits it
pub const DEFAULT_VOLUME: f32 = 90.0;

/// Pitch percent used when a play omits it
pub const DEFAULT_PITCH: f32 = 100.0;

/// Parameters of a play operation.
///
/// Volume and pitch are percentages, pan runs -100..100. None of them are
/// clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRequest {
    pub asset: String,
    pub volume: f32,
    pub fade_in: Duration,
    pub pan: f32,
    pub pitch: f32,
    pub looping: bool,
}

impl PlayRequest {
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            volume: DEFAULT_VOLUME,
            fade_in: Duration::ZERO,
            pan: 0.0,
            pitch: DEFAULT_PITCH,
            looping: true,
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_fade_in(mut self, fade_in: Duration) -> Self {
        self.fade_in = fade_in;
        self
    }

    pub fn with_pan(mut self, pan: f32) -> Self {
        self.pan = pan;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    /// Play through once instead of looping
    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }
}

/// Parameters of a fade operation, in the same units as [`PlayRequest`]
#[derive(Debug, Clone, PartialEq)]
pub struct FadeRequest {
    pub volume: f32,
    pub duration: Duration,
    pub pan: Option<f32>,
    pub pitch: Option<f32>,
}

impl FadeRequest {
    pub fn new(volume: f32, duration: Duration) -> Self {
        Self {
            volume,
            duration,
            pan: None,
            pitch: None,
        }
    }

    pub fn with_pan(mut self, pan: f32) -> Self {
        self.pan = Some(pan);
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = Some(pitch);
        self
    }
}

/// Audio system manager
///
/// Addresses any number of channels by (category, track).
pub struct MultiTrackAudio<B: AudioBackend> {
    backend: B,
    registry: TrackRegistry<B::Handle>,
    fades: FadeScheduler,
    policy: LifecyclePolicy,
    events: Option<EventBus>,
}

impl<B: AudioBackend> MultiTrackAudio<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            registry: TrackRegistry::new(),
            fades: FadeScheduler::new(),
            policy: LifecyclePolicy::default(),
            events: None,
        }
    }

    /// Publish activity on `bus`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn with_policy(mut self, policy: LifecyclePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub(crate) fn publish(&self, event: AudioEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }

    /// Start `request.asset` on `id`, replacing whatever plays there.
    ///
    /// The previous channel is stopped before the new handle is created. With
    /// a fade-in the channel starts silent and the fade owns the ramp to the
    /// target; otherwise the target volume is set directly.
    pub fn play(&mut self, id: ChannelId, request: PlayRequest) -> Result<ChannelToken, AudioError> {
        if let Some(previous) = self.registry.lookup(id) {
            tracing::debug!(
                "Stopping existing track before playing: {} ({})",
                id,
                previous.asset()
            );
            self.release(id);
        }

        let mut handle = self
            .backend
            .create_handle(id.category, &request.asset)
            .map_err(|source| AudioError::AssetUnavailable {
                category: id.category,
                asset: request.asset.clone(),
                source,
            })?;

        let target = request.volume / 100.0;
        handle.set_pan(request.pan / 100.0);
        handle.set_pitch(request.pitch / 100.0);

        let fading = !request.fade_in.is_zero();
        handle.set_volume(if fading { 0.0 } else { target });
        handle.play(request.looping);

        let token = self.registry.register(id, Channel::new(request.asset.clone(), handle));

        if fading {
            self.fades.schedule(
                id,
                FadeJob::new(token, Ramp::new(0.0, target), request.fade_in),
            );
            self.publish(AudioEvent::FadeStarted {
                channel: id,
                target,
                duration: request.fade_in,
            });
        }

        tracing::info!(
            "Audio playback started: {} {} (volume {}, fade-in {:?}, pan {}, pitch {})",
            id,
            request.asset,
            request.volume,
            request.fade_in,
            request.pan,
            request.pitch
        );
        self.publish(AudioEvent::ChannelStarted {
            channel: id,
            asset: request.asset,
        });

        Ok(token)
    }

    /// Stop the channel at `id`, fading out first when `fade_out` is non-zero.
    ///
    /// A fading stop keeps the channel registered until the fade completes.
    pub fn stop(&mut self, id: ChannelId, fade_out: Duration) -> Result<(), AudioError> {
        let channel = self
            .registry
            .lookup(id)
            .ok_or(AudioError::ChannelNotFound(id))?;

        if fade_out.is_zero() {
            self.release(id);
            return Ok(());
        }

        let job = FadeJob::new(channel.token(), Ramp::new(channel.volume(), 0.0), fade_out).releasing();
        self.fades.schedule(id, job);
        self.publish(AudioEvent::FadeStarted {
            channel: id,
            target: 0.0,
            duration: fade_out,
        });
        Ok(())
    }

    /// Ramp the channel at `id` toward `request`.
    ///
    /// Replaces any fade already running on `id`; a pending fading stop still
    /// releases the channel once this fade finishes. A zero duration applies
    /// the targets immediately.
    pub fn fade(&mut self, id: ChannelId, request: FadeRequest) -> Result<(), AudioError> {
        let channel = self
            .registry
            .lookup_mut(id)
            .ok_or(AudioError::ChannelNotFound(id))?;

        let target = request.volume / 100.0;
        let mut job = FadeJob::new(
            channel.token(),
            Ramp::new(channel.volume(), target),
            request.duration,
        );
        if let Some(pan) = request.pan {
            job = job.with_pan(Ramp::new(channel.pan(), pan / 100.0));
        }
        if let Some(pitch) = request.pitch {
            job = job.with_pitch(Ramp::new(channel.pitch(), pitch / 100.0));
        }

        if request.duration.is_zero() {
            let pending_stop = self.fades.releases(id, channel.token());
            self.fades.cancel(id);
            job.finish(channel.handle_mut());
            tracing::debug!("Volume set immediately: {} -> {:.3}", id, target);
            self.publish(AudioEvent::FadeCompleted { channel: id });
            if pending_stop {
                self.release(id);
            }
            return Ok(());
        }

        self.fades.schedule(id, job);
        self.publish(AudioEvent::FadeStarted {
            channel: id,
            target,
            duration: request.duration,
        });
        Ok(())
    }

    /// Fade `asset` in on `to` while fading `from` out over the same duration.
    ///
    /// The destination always starts first. An empty source (or a source equal
    /// to the destination, which the play has already replaced) degrades to a
    /// plain fade-in.
    pub fn crossfade(
        &mut self,
        from: ChannelId,
        to: ChannelId,
        asset: &str,
        duration: Duration,
    ) -> Result<(), AudioError> {
        let source_active = from != to && self.registry.lookup(from).is_some();

        tracing::debug!(
            "Starting crossfade: {} -> {} ({}) over {:?}",
            from,
            to,
            asset,
            duration
        );
        self.play(to, PlayRequest::new(asset).with_fade_in(duration))?;

        if source_active {
            self.stop(from, duration)?;
        } else {
            tracing::debug!("Crossfade source {} is silent, nothing to fade out", from);
        }
        Ok(())
    }

    /// Stop and remove every channel under `category` without fading
    pub fn stop_all_of_category(&mut self, category: AudioCategory) -> usize {
        self.fades.cancel_category(category);
        let ids = self.registry.ids_in(category);
        let count = ids.into_iter().filter(|id| self.release(*id)).count();
        tracing::debug!("All custom {} tracks stopped ({})", category, count);
        count
    }

    /// Stop and remove every channel without fading
    pub fn stop_all(&mut self) -> usize {
        self.fades.cancel_all();
        let channels = self.registry.drain();
        let count = channels.len();
        for (id, mut channel) in channels {
            channel.handle_mut().stop();
            self.publish(AudioEvent::ChannelStopped { channel: id });
        }
        tracing::debug!("All custom audio tracks stopped ({})", count);
        count
    }

    /// Move all fades forward by `elapsed` of real time
    pub fn advance(&mut self, elapsed: Duration) -> Vec<FadeOutcome> {
        let outcomes = self.fades.advance(elapsed, &mut self.registry);
        for outcome in &outcomes {
            match *outcome {
                FadeOutcome::Completed { id } => {
                    self.publish(AudioEvent::FadeCompleted { channel: id });
                }
                FadeOutcome::Released { id } => {
                    self.publish(AudioEvent::FadeCompleted { channel: id });
                    self.publish(AudioEvent::ChannelStopped { channel: id });
                }
                FadeOutcome::Superseded { id } => {
                    self.publish(AudioEvent::FadeSuperseded { channel: id });
                }
            }
        }
        outcomes
    }

    /// Apply the lifecycle policy to a host notification
    pub fn notify(&mut self, event: HostEvent) -> usize {
        let stopped = match self.policy.teardown_for(event) {
            Teardown::Nothing => 0,
            Teardown::All => self.stop_all(),
            Teardown::Categories(categories) => categories
                .into_iter()
                .map(|category| self.stop_all_of_category(category))
                .sum::<usize>(),
        };
        tracing::debug!("{}: stopped {} channel(s)", event.description(), stopped);
        self.publish(AudioEvent::HostEventHandled { event, stopped });
        stopped
    }

    pub fn on_new_game(&mut self) -> usize {
        self.notify(HostEvent::NewGame)
    }

    pub fn on_load_game(&mut self) -> usize {
        self.notify(HostEvent::GameLoaded)
    }

    pub fn on_title(&mut self) -> usize {
        self.notify(HostEvent::TitleEntered)
    }

    pub fn on_scene_transition(&mut self, from: Scene, to: Scene) -> usize {
        self.notify(HostEvent::SceneChanged { from, to })
    }

    /// Stop and unregister one channel; false if nothing was there
    fn release(&mut self, id: ChannelId) -> bool {
        self.fades.cancel(id);
        match self.registry.remove(id) {
            Some(mut channel) => {
                channel.handle_mut().stop();
                tracing::info!("Audio stopped: {}", id);
                self.publish(AudioEvent::ChannelStopped { channel: id });
                true
            }
            None => false,
        }
    }

    pub fn channel(&self, id: ChannelId) -> Option<&Channel<B::Handle>> {
        self.registry.lookup(id)
    }

    pub fn is_active(&self, id: ChannelId) -> bool {
        self.registry.lookup(id).is_some()
    }

    pub fn active_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &TrackRegistry<B::Handle> {
        &self.registry
    }

    pub fn fades(&self) -> &FadeScheduler {
        &self.fades
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> &LifecyclePolicy {
        &self.policy
    }
}
