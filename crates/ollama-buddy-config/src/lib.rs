//! Ollama Buddy configuration
//!
//! Layered loading of the connection parameters (endpoint, fallback list,
//! timeouts, refresh cadence) from an optional TOML file and
//! `OLLAMA_BUDDY__*` environment overrides.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{
    BuddyConfig, ConnectionConfig, NotificationConfig, DEFAULT_ENDPOINT, FALLBACK_ENDPOINTS,
};
