//! Error types for probing and connection management

use thiserror::Error;

/// Why a probe or listing request against an endpoint failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("Timed out reaching {endpoint}")]
    Timeout { endpoint: String },

    #[error("Network error reaching {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    #[error("{endpoint} answered HTTP {status}")]
    BadStatus { endpoint: String, status: u16 },

    #[error("Malformed model listing from {endpoint}: {message}")]
    Parse { endpoint: String, message: String },
}

impl ProbeError {
    /// Endpoint the failed request targeted
    pub fn endpoint(&self) -> &str {
        match self {
            ProbeError::Timeout { endpoint }
            | ProbeError::Network { endpoint, .. }
            | ProbeError::BadStatus { endpoint, .. }
            | ProbeError::Parse { endpoint, .. } => endpoint,
        }
    }

    /// Classify a transport error from reqwest
    pub fn from_reqwest(endpoint: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else {
            ProbeError::Network {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Errors returned by the connection manager's fallible operations
#[derive(Debug, Error)]
pub enum LocalModelError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Probe(#[from] ProbeError),
}
