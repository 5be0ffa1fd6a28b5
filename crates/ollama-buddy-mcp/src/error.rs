//! Error types for capability provider lookups

use thiserror::Error;

/// Result type for capability provider operations
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors raised by the strict registry accessors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum McpError {
    #[error("Capability provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Config key '{key}' of provider '{id}' is missing")]
    ConfigKeyNotFound { id: String, key: String },
}
