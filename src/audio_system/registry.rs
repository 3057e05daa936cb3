/// Track registry
///
/// Maps each channel identity to its live channel. At most one channel exists
/// per identity; the owner stops and removes the old channel before binding a
/// new one.
use std::collections::HashMap;

use super::backend::PlaybackHandle;
use super::source::{AudioCategory, ChannelId};

/// Generation token stamped on every registered channel.
///
/// Fade jobs remember the token of the channel they were started for and
/// become no-ops once the identity is bound to a different channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelToken(u64);

/// Live binding of an identity to a playback handle
pub struct Channel<H> {
    asset: String,
    handle: H,
    token: ChannelToken,
}

impl<H: PlaybackHandle> Channel<H> {
    pub fn new(asset: impl Into<String>, handle: H) -> Self {
        Self {
            asset: asset.into(),
            handle,
            token: ChannelToken(0),
        }
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn token(&self) -> ChannelToken {
        self.token
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    pub fn volume(&self) -> f32 {
        self.handle.volume()
    }

    pub fn pan(&self) -> f32 {
        self.handle.pan()
    }

    pub fn pitch(&self) -> f32 {
        self.handle.pitch()
    }
}

/// Registry of active channels
pub struct TrackRegistry<H> {
    channels: HashMap<ChannelId, Channel<H>>,
    next_token: u64,
}

impl<H: PlaybackHandle> TrackRegistry<H> {
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
            next_token: 1,
        }
    }

    /// Bind `channel` to `id` and return the fresh token stamped on it.
    ///
    /// `id` must be vacant; a channel still bound there is dropped unstopped.
    pub fn register(&mut self, id: ChannelId, mut channel: Channel<H>) -> ChannelToken {
        let token = ChannelToken(self.next_token);
        self.next_token += 1;
        channel.token = token;
        self.channels.insert(id, channel);
        token
    }

    pub fn lookup(&self, id: ChannelId) -> Option<&Channel<H>> {
        self.channels.get(&id)
    }

    pub fn lookup_mut(&mut self, id: ChannelId) -> Option<&mut Channel<H>> {
        self.channels.get_mut(&id)
    }

    /// Drop the entry without stopping it; the caller must already have
    /// stopped the handle.
    pub fn remove(&mut self, id: ChannelId) -> Option<Channel<H>> {
        self.channels.remove(&id)
    }

    /// Whether `id` is still bound to the channel that carried `token`
    pub fn is_current(&self, id: ChannelId, token: ChannelToken) -> bool {
        self.channels
            .get(&id)
            .map(|c| c.token == token)
            .unwrap_or(false)
    }

    pub fn entries(&self) -> impl Iterator<Item = (ChannelId, &Channel<H>)> {
        self.channels.iter().map(|(id, channel)| (*id, channel))
    }

    /// Identities currently bound under `category`
    pub fn ids_in(&self, category: AudioCategory) -> Vec<ChannelId> {
        self.channels
            .keys()
            .filter(|id| id.category == category)
            .copied()
            .collect()
    }

    /// Remove every channel, handing them back for the caller to stop
    pub fn drain(&mut self) -> Vec<(ChannelId, Channel<H>)> {
        self.channels.drain().collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl<H: PlaybackHandle> Default for TrackRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
