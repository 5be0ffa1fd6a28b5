//! Error types for building a session context

use thiserror::Error;

/// Result type for context construction
pub type Result<T> = std::result::Result<T, ContextError>;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Configuration error: {0}")]
    Config(#[from] ollama_buddy_config::ConfigError),

    #[error("Connection setup failed: {0}")]
    Connection(#[from] ollama_buddy_models::LocalModelError),
}
