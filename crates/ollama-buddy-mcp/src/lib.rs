//! Capability providers ("MCP servers") for Ollama Buddy
//!
//! Providers are metadata plus a typed configuration map; none of them
//! execute anything. The registry holds a fixed set of providers whose
//! `enabled` flag and configuration can change at runtime, and the
//! notification relay is gated on the `notification` provider.

pub mod catalog;
pub mod error;
pub mod notification;
pub mod provider;
pub mod registry;

pub use catalog::default_providers;
pub use error::{McpError, Result};
pub use notification::{Delivery, NotificationRelay, NOTIFICATION_PROVIDER_ID};
pub use provider::{CapabilityProvider, ConfigValue, DisplayMetadata, ProviderConfig, ProviderKind};
pub use registry::CapabilityRegistry;
