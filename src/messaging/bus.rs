use crossbeam_channel::{unbounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;
/// Event bus for pub/sub messaging
///
/// Lets observers (the debug overlay, the simulator, tests) follow what the
/// swapper does without coupling to it.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::events::SwapperEvent;

/// Subscriber ID for tracking subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

/// Event subscriber
struct Subscriber {
    id: SubscriberId,
    sender: Sender<SwapperEvent>,
}

/// Event bus for broadcasting events to subscribers
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
    next_id: Arc<AtomicUsize>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events, returns a receiver and subscription ID
    pub fn subscribe(&self) -> (Receiver<SwapperEvent>, SubscriberId) {
        let (tx, rx) = unbounded();
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));

        self.subscribers
            .write()
            .push(Subscriber { id, sender: tx });

        (rx, id)
    }

    /// Unsubscribe from events
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.write().retain(|s| s.id != id);
    }

    /// Publish an event to all subscribers.
    ///
    /// Subscribers whose receiver was dropped are removed.
    pub fn publish(&self, event: SwapperEvent) {
        let closed: Vec<SubscriberId> = self
            .subscribers
            .read()
            .iter()
            .filter(|s| {
                matches!(
                    s.sender.try_send(event.clone()),
                    Err(TrySendError::Disconnected(_))
                )
            })
            .map(|s| s.id)
            .collect();

        if !closed.is_empty() {
            tracing::debug!("Removing {} closed event subscribers", closed.len());
            self.subscribers
                .write()
                .retain(|s| !closed.contains(&s.id));
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}
