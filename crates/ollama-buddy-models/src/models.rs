//! Model descriptors and the `/api/tags` listing format

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Capability tags assumed for a listed model when nothing better is known
pub const DEFAULT_CAPABILITIES: [&str; 3] = ["chat", "code", "completion"];

const UNKNOWN_SIZE: &str = "unknown";
const GENERIC_DESCRIPTION: &str = "Local Ollama model";

/// A model the user can pick for chat and code assistance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelDescriptor {
    /// Unique identifier (the server-side model name for listed models)
    pub id: String,

    /// Display name
    pub name: String,

    /// Human-readable size, e.g. "8B" or "3.8 GB"
    pub size_label: String,

    pub description: String,

    /// Whether the model is present on the server
    pub installed: bool,

    /// Capability tags such as "chat", "code" or "vision"
    pub capabilities: BTreeSet<String>,
}

impl ModelDescriptor {
    /// Check whether the model advertises a capability tag
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}

fn seed(
    id: &str,
    name: &str,
    size_label: &str,
    description: &str,
    installed: bool,
    capabilities: &[&str],
) -> ModelDescriptor {
    ModelDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        size_label: size_label.to_string(),
        description: description.to_string(),
        installed,
        capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
    }
}

/// Models shown before the first successful refresh
pub fn default_models() -> Vec<ModelDescriptor> {
    vec![
        seed(
            "llama3",
            "Llama 3 8B",
            "8B",
            "Meta's latest open model, great for code generation",
            true,
            &["chat", "code", "completion"],
        ),
        seed(
            "codellama",
            "Code Llama 15B",
            "15B",
            "Specialized for code generation and completion",
            true,
            &["chat", "code", "completion", "debug"],
        ),
        seed(
            "phi3",
            "Phi-3 14B",
            "14B",
            "Microsoft's latest model with strong coding abilities",
            false,
            &["chat", "code", "reasoning"],
        ),
        seed(
            "llava",
            "LLaVa 34B",
            "34B",
            "Multimodal model with vision capabilities",
            false,
            &["chat", "code", "vision"],
        ),
    ]
}

/// Format a byte count with binary units and one decimal
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;
    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.1} {}", size, UNITS[unit_idx])
}

/// Body of `GET /api/tags`
#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    pub models: Vec<RemoteModel>,
}

/// One entry of the tags listing
#[derive(Debug, Deserialize)]
pub struct RemoteModel {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    /// Free-form string in older servers, an object in current ones
    #[serde(default)]
    pub details: Option<Value>,
}

impl RemoteModel {
    fn description(&self) -> String {
        match &self.details {
            Some(Value::String(text)) if !text.is_empty() => text.clone(),
            Some(Value::Object(map)) => {
                let parts: Vec<&str> = ["family", "parameter_size", "quantization_level"]
                    .iter()
                    .filter_map(|key| map.get(*key).and_then(Value::as_str))
                    .filter(|s| !s.is_empty())
                    .collect();
                if parts.is_empty() {
                    GENERIC_DESCRIPTION.to_string()
                } else {
                    parts.join(" ")
                }
            }
            _ => GENERIC_DESCRIPTION.to_string(),
        }
    }

    fn capabilities(&self) -> BTreeSet<String> {
        let mut caps: BTreeSet<String> =
            DEFAULT_CAPABILITIES.iter().map(|c| c.to_string()).collect();
        let lower = self.name.to_lowercase();
        if lower.contains("llava") || lower.contains("vision") {
            caps.insert("vision".to_string());
        }
        caps
    }
}

impl From<RemoteModel> for ModelDescriptor {
    fn from(remote: RemoteModel) -> Self {
        let size_label = remote
            .size
            .map(format_size)
            .unwrap_or_else(|| UNKNOWN_SIZE.to_string());
        let description = remote.description();
        let capabilities = remote.capabilities();

        ModelDescriptor {
            id: remote.name.clone(),
            name: remote.name,
            size_label,
            description,
            installed: true,
            capabilities,
        }
    }
}

/// Parse a tags listing body into descriptors, keeping the first entry per name
pub fn parse_listing(body: &str) -> Result<Vec<ModelDescriptor>, serde_json::Error> {
    let response: TagsResponse = serde_json::from_str(body)?;
    let mut seen = HashSet::new();
    Ok(response
        .models
        .into_iter()
        .filter(|m| seen.insert(m.name.clone()))
        .map(ModelDescriptor::from)
        .collect())
}
