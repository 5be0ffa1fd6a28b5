//! Configuration manager implementation

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use tracing::{debug, info};

use crate::{
    error::{ConfigError, Result},
    types::BuddyConfig,
};

/// Environment variable prefix, e.g. `OLLAMA_BUDDY__CONNECTION__ENDPOINT`
const ENV_PREFIX: &str = "OLLAMA_BUDDY";

/// Loads, validates and saves [`BuddyConfig`]
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Create a manager pointing at the default config path
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Create with custom config path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Override the environment prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Path the manager reads from and writes to
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ollama-buddy")
            .join("config.toml")
    }

    /// Load configuration: defaults, then the file if present, then the environment
    pub fn load_config(&self) -> Result<BuddyConfig> {
        debug!("Loading configuration from {}", self.config_path.display());

        let config = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("connection.fallback_endpoints")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: BuddyConfig = config.try_deserialize()?;
        self.validate_config(&loaded)?;
        Ok(loaded)
    }

    /// Write configuration as TOML, creating parent directories
    pub fn save_config(&self, config: &BuddyConfig) -> Result<()> {
        self.validate_config(config)?;
        let toml = toml::to_string_pretty(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml)?;
        info!("Saved configuration to {}", self.config_path.display());
        Ok(())
    }

    /// Reject values the connection manager cannot work with
    pub fn validate_config(&self, config: &BuddyConfig) -> Result<()> {
        let conn = &config.connection;
        if conn.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Endpoint must not be empty".to_string(),
            ));
        }
        if conn.fallback_endpoints.is_empty() {
            return Err(ConfigError::Validation(
                "Fallback endpoint list must not be empty".to_string(),
            ));
        }
        if conn.request_timeout_secs == 0 || conn.probe_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "Timeouts must be greater than 0".to_string(),
            ));
        }
        if conn.refresh_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "Refresh interval must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
