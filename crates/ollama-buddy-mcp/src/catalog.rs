//! Built-in capability provider catalog

use crate::provider::{CapabilityProvider, ProviderKind};

const SERVERS_REPO: &str = "https://github.com/modelcontextprotocol/servers/tree/main/src";

fn source(id: &str) -> String {
    format!("{}/{}", SERVERS_REPO, id)
}

fn provider(kind: ProviderKind, description: &str) -> CapabilityProvider {
    CapabilityProvider::new(kind, description, source(kind.id()))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The sixteen providers every session starts with, in display order
pub fn default_providers() -> Vec<CapabilityProvider> {
    vec![
        provider(ProviderKind::Notification, "Send notifications to your mobile device")
            .enabled(true)
            .with_capabilities(&["notify", "push"])
            .with_setting("channels", strings(&["push"]))
            .with_setting("min_priority", "normal")
            .with_setting("quiet_hours", false),
        provider(ProviderKind::Voice, "Enable voice interaction with Ollama models")
            .enabled(true)
            .with_capabilities(&["speech-to-text", "text-to-speech"])
            .with_setting("input_enabled", true)
            .with_setting("output_enabled", true)
            .with_setting("language", "en-US")
            .with_setting("speech_rate", 100i64),
        provider(ProviderKind::Vision, "Allow AI to see and analyze your screen")
            .enabled(true)
            .with_capabilities(&["vision", "screen-capture"])
            .with_setting("screen_capture", true)
            .with_setting("capture_interval_secs", 0i64)
            .with_setting("max_resolution", "1920x1080"),
        provider(
            ProviderKind::Browser,
            "Allow AI to perform web searches and access online resources",
        )
        .enabled(true)
        .with_capabilities(&["browse", "fetch"])
        .with_setting("allowed_domains", strings(&[]))
        .with_setting("javascript", false),
        provider(ProviderKind::FileSystem, "Allow AI to read and write files on your system")
            .enabled(true)
            .with_capabilities(&["read-files", "write-files"])
            .with_setting("allowed_paths", strings(&["~/projects"]))
            .with_setting("read_only", false)
            .with_setting("max_file_size_mb", 10i64),
        provider(ProviderKind::Terminal, "Run shell commands suggested by the assistant")
            .with_capabilities(&["execute"])
            .with_setting("shell", "/bin/bash")
            .with_setting("require_confirmation", true)
            .with_setting("timeout_secs", 60i64),
        provider(ProviderKind::Git, "Inspect history, diffs and branches of the open repository")
            .with_capabilities(&["vcs", "read-files"])
            .with_setting("default_branch", "main")
            .with_setting("auto_stage", false),
        provider(ProviderKind::Database, "Query local databases with natural language")
            .with_capabilities(&["query"])
            .with_setting("connection_string", "")
            .with_setting("read_only", true),
        provider(ProviderKind::Search, "Search the web for documentation and examples")
            .with_capabilities(&["search"])
            .with_setting("engine", "duckduckgo")
            .with_setting("max_results", 10i64)
            .with_setting("safe_search", true),
        provider(ProviderKind::Screenshot, "Capture screenshots to share with vision models")
            .with_capabilities(&["screen-capture"])
            .with_setting("format", "png")
            .with_setting("include_cursor", false),
        provider(ProviderKind::Clipboard, "Read from and write to the system clipboard")
            .with_capabilities(&["clipboard"])
            .with_setting("history_size", 20i64)
            .with_setting("watch", false),
        provider(ProviderKind::Calendar, "Look up and schedule calendar events")
            .with_capabilities(&["schedule"])
            .with_setting("provider", "caldav")
            .with_setting("lookahead_days", 7i64),
        provider(ProviderKind::Email, "Send summaries and alerts by email")
            .with_capabilities(&["notify", "email"])
            .with_setting("smtp_host", "")
            .with_setting("smtp_port", 587i64)
            .with_setting("recipients", strings(&[])),
        provider(ProviderKind::Slack, "Post messages to Slack channels")
            .with_capabilities(&["notify", "chat-ops"])
            .with_setting("workspace", "")
            .with_setting("channels", strings(&[]))
            .with_setting("mention_only", true),
        provider(ProviderKind::Docker, "Inspect and manage local containers")
            .with_capabilities(&["containers", "execute"])
            .with_setting("socket_path", "/var/run/docker.sock")
            .with_setting("allow_exec", false),
        provider(ProviderKind::Memory, "Remember facts across conversations in this session")
            .with_capabilities(&["memory"])
            .with_setting("max_entries", 1000i64)
            .with_setting("persist", false),
    ]
}
