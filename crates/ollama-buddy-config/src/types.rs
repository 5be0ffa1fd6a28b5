//! Configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Common local and container addresses of an Ollama server, scanned in order
pub const FALLBACK_ENDPOINTS: [&str; 10] = [
    "http://localhost:11434",
    "http://127.0.0.1:11434",
    "http://0.0.0.0:11434",
    "http://host.docker.internal:11434",
    "http://ollama:11434",
    "http://172.17.0.1:11434",
    "http://[::1]:11434",
    "http://localhost:11435",
    "http://127.0.0.1:11435",
    "http://ollama.local:11434",
];

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BuddyConfig {
    /// Model server connection settings
    pub connection: ConnectionConfig,
    /// Notification relay settings
    pub notifications: NotificationConfig,
}

/// How to reach and keep track of the local model server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Base URL of the model server
    pub endpoint: String,
    /// Ordered candidates tried when the active endpoint fails
    pub fallback_endpoints: Vec<String>,
    /// Timeout for model listing requests
    pub request_timeout_secs: u64,
    /// Timeout for each fallback candidate probe
    pub probe_timeout_secs: u64,
    /// Interval between passive refreshes
    pub refresh_interval_secs: u64,
    /// Scan fallback endpoints when the startup refresh fails
    pub auto_discover: bool,
}

impl ConnectionConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            fallback_endpoints: FALLBACK_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            request_timeout_secs: 30,
            probe_timeout_secs: 3,
            refresh_interval_secs: 30,
            auto_discover: true,
        }
    }
}

/// Notification relay settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationConfig {
    /// Delay before announcing that the notification provider is active
    pub activation_delay_ms: u64,
}

impl NotificationConfig {
    pub fn activation_delay(&self) -> Duration {
        Duration::from_millis(self.activation_delay_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            activation_delay_ms: 2000,
        }
    }
}
