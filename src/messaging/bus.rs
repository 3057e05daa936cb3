use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
/// Event bus for pub/sub messaging
///
/// Lets hosts and tools observe channel activity without polling the registry.
use std::sync::Arc;

use super::events::AudioEvent;

/// Subscriber ID for tracking subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

struct Subscriber {
    id: SubscriberId,
    sender: Sender<AudioEvent>,
}

/// Event bus for broadcasting audio events to subscribers
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
    next_id: Arc<RwLock<usize>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events, returns a receiver and subscription ID
    pub fn subscribe(&self) -> (Receiver<AudioEvent>, SubscriberId) {
        let (tx, rx) = unbounded();

        let mut next_id = self.next_id.write();
        let id = SubscriberId(*next_id);
        *next_id += 1;
        drop(next_id);

        self.subscribers.write().push(Subscriber { id, sender: tx });

        (rx, id)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.write().retain(|s| s.id != id);
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: AudioEvent) {
        let mut subscribers = self.subscribers.write();

        // Closed receivers are pruned
        subscribers.retain(|subscriber| subscriber.sender.try_send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}
