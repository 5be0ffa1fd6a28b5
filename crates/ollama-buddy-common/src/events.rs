//! Event types published on the Ollama Buddy event bus

use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority attached to a user-facing notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        };
        f.write_str(s)
    }
}

/// Lifecycle of the connection to the local model server
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStatus {
    /// No refresh has been attempted yet
    #[default]
    Unconnected,
    /// A refresh or discovery scan is in flight
    Connecting,
    /// The last committed refresh succeeded
    Connected,
    /// The last committed refresh failed
    ConnectionFailed,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionStatus::Unconnected => "unconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::ConnectionFailed => "connection-failed",
        };
        f.write_str(s)
    }
}

/// Events observed by the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum BuddyEvent {
    /// Transient in-app message (connection results, settings saved)
    Toast {
        title: String,
        description: String,
    },
    /// Message delivered through the notification capability provider
    Notification {
        title: String,
        message: String,
        priority: Priority,
    },
    /// A capability provider was switched on or off
    ProviderToggled {
        /// Provider identifier
        id: String,
        /// Human-readable provider name
        name: String,
        enabled: bool,
    },
    /// Configuration keys of a capability provider were overwritten
    ProviderConfigUpdated {
        id: String,
        keys: Vec<String>,
    },
    /// Connection state committed a transition
    ConnectionChanged {
        endpoint: String,
        status: ConnectionStatus,
        model_count: usize,
    },
}

impl BuddyEvent {
    /// Build a toast event
    pub fn toast(title: impl Into<String>, description: impl Into<String>) -> Self {
        BuddyEvent::Toast {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Title shown to the user, if the event is user-visible
    pub fn title(&self) -> Option<&str> {
        match self {
            BuddyEvent::Toast { title, .. } | BuddyEvent::Notification { title, .. } => {
                Some(title)
            }
            _ => None,
        }
    }
}
