//! Event bus shared by the connection manager, capability registry and
//! notification relay
//!
//! Backed by a tokio broadcast channel. Publishing never blocks and never
//! fails; events sent with no subscribers are dropped.
//!
//! # Example
//!
//! ```rust
//! use ollama_buddy_common::{BuddyEvent, EventBus};
//!
//! # tokio_test::block_on(async {
//! let bus = EventBus::new();
//! let mut subscriber = bus.subscribe();
//!
//! bus.publish(BuddyEvent::toast("Settings saved", "Your settings have been updated."));
//!
//! let event = subscriber.recv().await.unwrap();
//! assert_eq!(event.title(), Some("Settings saved"));
//! # });
//! ```

use tokio::sync::broadcast;
use tracing::trace;

use crate::events::BuddyEvent;

/// Channel capacity for broadcast events
const CHANNEL_CAPACITY: usize = 256;

/// Cloneable handle to a single broadcast channel
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<BuddyEvent>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    /// Create a new event bus with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers
    pub fn publish(&self, event: BuddyEvent) {
        trace!(?event, "publishing event");
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribe to events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<BuddyEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
