//! Ollama Buddy session context
//!
//! [`BuddyContext`] is built once per session and handed to every consumer.
//! It wires the connection manager, the capability registry and the
//! notification relay onto one event bus. [`OllamaDetector`] runs the
//! startup detection and keeps refreshing in the background.

pub mod context;
pub mod detector;
pub mod error;

pub use context::BuddyContext;
pub use detector::{Detection, DetectorHandle, OllamaDetector};
pub use error::{ContextError, Result};
