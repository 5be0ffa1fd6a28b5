//! Local model connection management for Ollama Buddy
//!
//! This crate owns everything between the app and the local Ollama server:
//! the model descriptors, the `/api/tags` endpoint probe, and the
//! connection state machine with fallback endpoint discovery.

pub mod error;
pub mod manager;
pub mod models;
pub mod probe;

pub use error::{LocalModelError, ProbeError};
pub use manager::{ConnectionManager, ConnectionState, DiscoveryOutcome, RefreshOutcome};
pub use models::{default_models, format_size, parse_listing, ModelDescriptor};
pub use ollama_buddy_common::ConnectionStatus;
pub use probe::{EndpointProbe, HttpProbe};

/// Result type for local model operations
pub type Result<T> = std::result::Result<T, LocalModelError>;
