//! Notification relay
//!
//! Where a push, SMS or email integration would attach. Delivery is gated on
//! the `notification` capability provider; a delivered notification becomes
//! a [`BuddyEvent::Notification`] on the event bus.

use tracing::{info, warn};

use ollama_buddy_common::{BuddyEvent, EventBus, Priority};

use crate::registry::CapabilityRegistry;

/// Id of the provider gating the relay
pub const NOTIFICATION_PROVIDER_ID: &str = "notification";

/// What happened to a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// The notification provider is disabled; nothing was shown
    Suppressed,
}

/// Sends user-visible notifications when the notification provider is enabled
#[derive(Clone)]
pub struct NotificationRelay {
    registry: CapabilityRegistry,
    events: EventBus,
}

impl NotificationRelay {
    pub fn new(registry: CapabilityRegistry, events: EventBus) -> Self {
        Self { registry, events }
    }

    /// Whether notifications would currently be delivered
    pub fn is_enabled(&self) -> bool {
        self.registry.is_enabled(NOTIFICATION_PROVIDER_ID)
    }

    /// Send with normal priority
    pub fn notify(&self, title: &str, message: &str) -> Delivery {
        self.notify_with_priority(title, message, Priority::Normal)
    }

    pub fn notify_with_priority(&self, title: &str, message: &str, priority: Priority) -> Delivery {
        if !self.is_enabled() {
            warn!("Notifications are disabled, dropping: {}", title);
            return Delivery::Suppressed;
        }

        info!("Sending notification: {} - {} ({})", title, message, priority);
        self.events.publish(BuddyEvent::Notification {
            title: title.to_string(),
            message: message.to_string(),
            priority,
        });
        Delivery::Delivered
    }
}
