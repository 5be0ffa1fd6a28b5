//! Explicit state holder shared by every consumer of a session

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

use ollama_buddy_common::{BuddyEvent, EventBus, Priority};
use ollama_buddy_config::{BuddyConfig, ConfigManager};
use ollama_buddy_mcp::{
    CapabilityRegistry, Delivery, NotificationRelay, ProviderConfig, NOTIFICATION_PROVIDER_ID,
};
use ollama_buddy_models::{
    probe::ProbeResult, ConnectionManager, EndpointProbe, ModelDescriptor, RefreshOutcome,
};

use crate::error::Result;

const ACTIVATION_TITLE: &str = "Notification Service Active";
const ACTIVATION_MESSAGE: &str =
    "The notification MCP server is now running and can send alerts to your mobile device.";

/// Session state: connection, capability providers and notifications
#[derive(Clone)]
pub struct BuddyContext {
    config: Arc<BuddyConfig>,
    events: EventBus,
    connection: ConnectionManager,
    registry: CapabilityRegistry,
    notifications: NotificationRelay,
}

impl BuddyContext {
    /// Build a context that probes the model server over HTTP
    pub fn new(config: BuddyConfig) -> Result<Self> {
        let events = EventBus::new();
        let connection = ConnectionManager::new(&config.connection, events.clone())?;
        Ok(Self::assemble(config, events, connection))
    }

    /// Build a context from the layered configuration of `manager`
    pub fn load(manager: &ConfigManager) -> Result<Self> {
        let config = manager.load_config()?;
        Self::new(config)
    }

    /// Build a context with a custom probe implementation
    pub fn with_probe(config: BuddyConfig, probe: Arc<dyn EndpointProbe>) -> Self {
        let events = EventBus::new();
        let connection = ConnectionManager::with_probe(probe, &config.connection, events.clone());
        Self::assemble(config, events, connection)
    }

    fn assemble(config: BuddyConfig, events: EventBus, connection: ConnectionManager) -> Self {
        let registry = CapabilityRegistry::new(events.clone());
        let notifications = NotificationRelay::new(registry.clone(), events.clone());
        debug!(
            "Session context ready (endpoint {}, {} providers)",
            config.connection.endpoint,
            registry.len()
        );

        Self {
            config: Arc::new(config),
            events,
            connection,
            registry,
            notifications,
        }
    }

    pub fn config(&self) -> &BuddyConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BuddyEvent> {
        self.events.subscribe()
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn notifications(&self) -> &NotificationRelay {
        &self.notifications
    }

    /// Select a model from the current list
    pub fn select_model(&self, model_id: &str) -> ollama_buddy_models::Result<ModelDescriptor> {
        self.connection.set_selected_model(model_id)
    }

    /// Flip a provider, announcing the notification service when it comes on
    pub fn toggle_provider(&self, id: &str) -> Option<bool> {
        let enabled = self.registry.toggle(id)?;
        if enabled && id == NOTIFICATION_PROVIDER_ID {
            self.schedule_activation_notice();
        }
        Some(enabled)
    }

    /// Set a provider's flag, announcing the notification service when it comes on
    pub fn set_provider_enabled(&self, id: &str, enabled: bool) -> Option<bool> {
        let previous = self.registry.set_enabled(id, enabled)?;
        if enabled && !previous && id == NOTIFICATION_PROVIDER_ID {
            self.schedule_activation_notice();
        }
        Some(previous)
    }

    pub fn update_provider_config(&self, id: &str, partial: ProviderConfig) -> bool {
        self.registry.update_config(id, partial)
    }

    pub fn notify(&self, title: &str, message: &str) -> Delivery {
        self.notifications.notify(title, message)
    }

    pub fn notify_with_priority(&self, title: &str, message: &str, priority: Priority) -> Delivery {
        self.notifications
            .notify_with_priority(title, message, priority)
    }

    /// Store the endpoint from the settings panel and refresh against it
    pub async fn apply_settings(&self, endpoint: impl Into<String>) -> RefreshOutcome {
        let outcome = self.connection.set_endpoint(endpoint).await;
        self.events.publish(BuddyEvent::toast(
            "Settings saved",
            "Your settings have been updated successfully.",
        ));
        outcome
    }

    /// Probe the active endpoint once and report the result as a toast
    pub async fn test_connection(&self) -> ProbeResult<()> {
        self.events.publish(BuddyEvent::toast(
            "Connection test",
            "Testing connection to Ollama...",
        ));

        let result = self.connection.check_endpoint().await;
        let toast = match &result {
            Ok(()) => BuddyEvent::toast("Connection successful", "Successfully connected to Ollama"),
            Err(e) => BuddyEvent::toast("Connection failed", e.to_string()),
        };
        self.events.publish(toast);
        result
    }

    /// Announce the notification service if it is already on at startup
    pub fn announce_notifications(&self) -> bool {
        if !self.notifications.is_enabled() {
            return false;
        }
        self.schedule_activation_notice();
        true
    }

    fn schedule_activation_notice(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No async runtime, skipping notification activation notice");
            return;
        };

        let relay = self.notifications.clone();
        let delay = self.config.notifications.activation_delay();
        info!("Notification provider enabled");
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            relay.notify(ACTIVATION_TITLE, ACTIVATION_MESSAGE);
        });
    }
}
