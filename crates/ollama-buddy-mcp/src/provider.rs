//! Capability provider descriptors and their typed configuration values

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of capability providers the app knows how to present
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Notification,
    Voice,
    Vision,
    Browser,
    FileSystem,
    Terminal,
    Git,
    Database,
    Search,
    Screenshot,
    Clipboard,
    Calendar,
    Email,
    Slack,
    Docker,
    Memory,
}

/// How a provider is labelled in the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetadata {
    pub label: &'static str,
    /// Icon name from the UI icon set
    pub icon: &'static str,
}

impl ProviderKind {
    /// Every kind, in catalog order
    pub const ALL: [ProviderKind; 16] = [
        ProviderKind::Notification,
        ProviderKind::Voice,
        ProviderKind::Vision,
        ProviderKind::Browser,
        ProviderKind::FileSystem,
        ProviderKind::Terminal,
        ProviderKind::Git,
        ProviderKind::Database,
        ProviderKind::Search,
        ProviderKind::Screenshot,
        ProviderKind::Clipboard,
        ProviderKind::Calendar,
        ProviderKind::Email,
        ProviderKind::Slack,
        ProviderKind::Docker,
        ProviderKind::Memory,
    ];

    /// Stable provider id
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::Notification => "notification",
            ProviderKind::Voice => "voice",
            ProviderKind::Vision => "vision",
            ProviderKind::Browser => "browser",
            ProviderKind::FileSystem => "filesystem",
            ProviderKind::Terminal => "terminal",
            ProviderKind::Git => "git",
            ProviderKind::Database => "database",
            ProviderKind::Search => "search",
            ProviderKind::Screenshot => "screenshot",
            ProviderKind::Clipboard => "clipboard",
            ProviderKind::Calendar => "calendar",
            ProviderKind::Email => "email",
            ProviderKind::Slack => "slack",
            ProviderKind::Docker => "docker",
            ProviderKind::Memory => "memory",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.id() == id)
    }

    pub fn display(&self) -> DisplayMetadata {
        let (label, icon) = match self {
            ProviderKind::Notification => ("Notifications", "bell"),
            ProviderKind::Voice => ("Voice Input/Output", "mic"),
            ProviderKind::Vision => ("Computer Vision", "eye"),
            ProviderKind::Browser => ("Browser Access", "globe"),
            ProviderKind::FileSystem => ("File System Access", "hard-drive"),
            ProviderKind::Terminal => ("Terminal", "terminal"),
            ProviderKind::Git => ("Git", "git-branch"),
            ProviderKind::Database => ("Database", "database"),
            ProviderKind::Search => ("Web Search", "search"),
            ProviderKind::Screenshot => ("Screenshots", "camera"),
            ProviderKind::Clipboard => ("Clipboard", "clipboard"),
            ProviderKind::Calendar => ("Calendar", "calendar"),
            ProviderKind::Email => ("Email", "mail"),
            ProviderKind::Slack => ("Slack", "message-square"),
            ProviderKind::Docker => ("Docker", "container"),
            ProviderKind::Memory => ("Memory", "brain"),
        };
        DisplayMetadata { label, icon }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A single configuration value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    List(Vec<String>),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(value: Vec<String>) -> Self {
        ConfigValue::List(value)
    }
}

/// Provider configuration keyed by setting name
pub type ProviderConfig = BTreeMap<String, ConfigValue>;

/// Descriptor of one capability provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapabilityProvider {
    /// Unique id, equal to `kind.id()`
    pub id: String,
    pub kind: ProviderKind,
    pub name: String,
    pub description: String,
    pub source_url: String,
    pub enabled: bool,
    pub capabilities: BTreeSet<String>,
    pub config: ProviderConfig,
}

impl CapabilityProvider {
    /// Create a provider for `kind` using its display label as the name
    pub fn new(kind: ProviderKind, description: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            id: kind.id().to_string(),
            kind,
            name: kind.display().label.to_string(),
            description: description.into(),
            source_url: source_url.into(),
            enabled: false,
            capabilities: BTreeSet::new(),
            config: ProviderConfig::new(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_capabilities(mut self, capabilities: &[&str]) -> Self {
        self.capabilities = capabilities.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_setting(mut self, key: &str, value: impl Into<ConfigValue>) -> Self {
        self.config.insert(key.to_string(), value.into());
        self
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_id_round_trip_is_total() {
        for kind in ProviderKind::ALL {
            assert_eq!(ProviderKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(ProviderKind::from_id("teleport"), None);
    }

    #[test]
    fn test_config_value_untagged_json() {
        let config: ProviderConfig = serde_json::from_str(
            r#"{"on": true, "port": 587, "host": "smtp", "to": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(config["on"], ConfigValue::Bool(true));
        assert_eq!(config["port"].as_integer(), Some(587));
        assert_eq!(config["host"].as_text(), Some("smtp"));
        assert_eq!(config["to"].as_list().map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_accessors_reject_other_variants() {
        let value = ConfigValue::from("yes");
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.as_integer(), None);
        assert!(value.as_list().is_none());
    }
}
