//! Shared building blocks for Ollama Buddy crates
//!
//! Holds the event bus every component publishes to and the event types the
//! presentation layer consumes (toasts, notifications, provider and
//! connection changes).

pub mod bus;
pub mod events;

pub use bus::EventBus;
pub use events::{BuddyEvent, ConnectionStatus, Priority};
