//! Capability registry
//!
//! The set of provider ids is fixed when the registry is built. Only the
//! `enabled` flag and the configuration map of a provider change afterwards,
//! and operations on unknown ids are no-ops.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use ollama_buddy_common::{BuddyEvent, EventBus};

use crate::{
    catalog::default_providers,
    error::{McpError, Result},
    provider::{CapabilityProvider, ConfigValue, ProviderConfig},
};

/// Cloneable handle to the shared provider list
#[derive(Clone)]
pub struct CapabilityRegistry {
    providers: Arc<RwLock<Vec<CapabilityProvider>>>,
    events: EventBus,
}

impl CapabilityRegistry {
    /// Create a registry seeded with the built-in catalog
    pub fn new(events: EventBus) -> Self {
        Self::with_providers(default_providers(), events)
    }

    /// Create a registry over a custom provider list
    ///
    /// Later entries with an id already present are dropped.
    pub fn with_providers(providers: Vec<CapabilityProvider>, events: EventBus) -> Self {
        let mut unique: Vec<CapabilityProvider> = Vec::with_capacity(providers.len());
        for provider in providers {
            if unique.iter().any(|p| p.id == provider.id) {
                debug!("Skipping duplicate capability provider: {}", provider.id);
                continue;
            }
            unique.push(provider);
        }

        Self {
            providers: Arc::new(RwLock::new(unique)),
            events,
        }
    }

    /// Look up a provider by id
    pub fn get(&self, id: &str) -> Option<CapabilityProvider> {
        self.providers.read().iter().find(|p| p.id == id).cloned()
    }

    /// Look up a provider by id, failing for unknown ids
    pub fn require(&self, id: &str) -> Result<CapabilityProvider> {
        self.get(id)
            .ok_or_else(|| McpError::ProviderNotFound(id.to_string()))
    }

    /// All providers in catalog order
    pub fn list(&self) -> Vec<CapabilityProvider> {
        self.providers.read().clone()
    }

    pub fn list_enabled(&self) -> Vec<CapabilityProvider> {
        self.providers
            .read()
            .iter()
            .filter(|p| p.enabled)
            .cloned()
            .collect()
    }

    /// Enabled providers advertising `capability`
    pub fn providers_with_capability(&self, capability: &str) -> Vec<CapabilityProvider> {
        self.providers
            .read()
            .iter()
            .filter(|p| p.enabled && p.has_capability(capability))
            .cloned()
            .collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.providers.read().iter().map(|p| p.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }

    /// Whether `id` exists and is enabled
    pub fn is_enabled(&self, id: &str) -> bool {
        self.providers
            .read()
            .iter()
            .any(|p| p.id == id && p.enabled)
    }

    /// Flip the enabled flag of `id`, returning the new value
    pub fn toggle(&self, id: &str) -> Option<bool> {
        let (name, enabled) = {
            let mut providers = self.providers.write();
            let provider = providers.iter_mut().find(|p| p.id == id)?;
            provider.enabled = !provider.enabled;
            (provider.name.clone(), provider.enabled)
        };

        self.announce_toggle(id, name, enabled);
        Some(enabled)
    }

    /// Set the enabled flag of `id`, returning the previous value
    ///
    /// An event is published only when the flag actually changes.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> Option<bool> {
        let (name, previous) = {
            let mut providers = self.providers.write();
            let provider = providers.iter_mut().find(|p| p.id == id)?;
            let previous = provider.enabled;
            provider.enabled = enabled;
            (provider.name.clone(), previous)
        };

        if previous != enabled {
            self.announce_toggle(id, name, enabled);
        }
        Some(previous)
    }

    fn announce_toggle(&self, id: &str, name: String, enabled: bool) {
        info!(
            "{} {}",
            name,
            if enabled { "enabled" } else { "disabled" }
        );
        self.events.publish(BuddyEvent::ProviderToggled {
            id: id.to_string(),
            name,
            enabled,
        });
    }

    /// Merge `partial` into the configuration of `id`, overwriting by key
    ///
    /// Keys not yet present are added. Returns false for unknown ids.
    pub fn update_config(&self, id: &str, partial: ProviderConfig) -> bool {
        let keys: Vec<String> = partial.keys().cloned().collect();
        {
            let mut providers = self.providers.write();
            let Some(provider) = providers.iter_mut().find(|p| p.id == id) else {
                debug!("Ignoring config update for unknown provider: {}", id);
                return false;
            };
            provider.config.extend(partial);
        }

        debug!("Updated config of {}: {:?}", id, keys);
        self.events.publish(BuddyEvent::ProviderConfigUpdated {
            id: id.to_string(),
            keys,
        });
        true
    }

    /// Set a single configuration key of `id`
    pub fn set_config_value(&self, id: &str, key: &str, value: impl Into<ConfigValue>) -> bool {
        let mut partial = ProviderConfig::new();
        partial.insert(key.to_string(), value.into());
        self.update_config(id, partial)
    }

    /// Read one configuration value
    pub fn get_config(&self, id: &str, key: &str) -> Result<ConfigValue> {
        let provider = self.require(id)?;
        provider
            .config
            .get(key)
            .cloned()
            .ok_or_else(|| McpError::ConfigKeyNotFound {
                id: id.to_string(),
                key: key.to_string(),
            })
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new(EventBus::new())
    }
}
