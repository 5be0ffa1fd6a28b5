//! Startup detection and periodic refresh of the local model server

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use ollama_buddy_common::BuddyEvent;
use ollama_buddy_models::{DiscoveryOutcome, RefreshOutcome};

use crate::context::BuddyContext;

/// Floor for the refresh period; a zero period would spin
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// What the startup detection did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Refresh against the configured endpoint
    pub refresh: RefreshOutcome,
    /// Fallback scan, run only when the first refresh failed
    pub discovery: Option<DiscoveryOutcome>,
}

impl Detection {
    pub fn is_connected(&self) -> bool {
        match &self.discovery {
            Some(DiscoveryOutcome::Found { refresh, .. }) => refresh.is_connected(),
            Some(DiscoveryOutcome::Exhausted { .. })
            | Some(DiscoveryOutcome::Superseded { .. }) => false,
            None => self.refresh.is_connected(),
        }
    }
}

/// Finds the model server at startup and keeps the model list fresh
pub struct OllamaDetector;

impl OllamaDetector {
    /// Refresh once, falling back to discovery if enabled
    pub async fn detect(context: &BuddyContext) -> Detection {
        let connection = context.connection();
        let refresh = connection.refresh_models().await;

        let discovery = if !refresh.is_connected() && context.config().connection.auto_discover {
            info!(
                "Model server not reachable at {}, scanning fallbacks",
                connection.endpoint()
            );
            Some(connection.discover_alternates().await)
        } else {
            None
        };

        Detection { refresh, discovery }
    }

    /// Run detection, then refresh on the configured interval until stopped
    ///
    /// Also schedules the notification service notice when the provider is
    /// already enabled.
    pub fn start(context: BuddyContext) -> DetectorHandle {
        context.announce_notifications();
        let task = tokio::spawn(async move {
            let mut announced = None;

            let detection = Self::detect(&context).await;
            debug!("Startup detection finished: {:?}", detection);
            announce_connection(&context, &mut announced);

            let period = context
                .config()
                .connection
                .refresh_interval()
                .max(MIN_REFRESH_INTERVAL);
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let RefreshOutcome::Failed(e) = context.connection().refresh_models().await {
                    warn!("Periodic refresh failed: {}", e);
                }
                announce_connection(&context, &mut announced);
            }
        });

        DetectorHandle { task }
    }
}

/// Toast when the connection comes up or the model count changes
fn announce_connection(context: &BuddyContext, announced: &mut Option<usize>) {
    let state = context.connection().state();
    if !state.connected || state.models.is_empty() {
        *announced = None;
        return;
    }

    let count = state.models.len();
    if *announced == Some(count) {
        return;
    }
    *announced = Some(count);

    context.events().publish(BuddyEvent::toast(
        "Connected to Ollama",
        format!("Found {} models on your system.", count),
    ));
}

/// Background detector task; aborted when stopped or dropped
pub struct DetectorHandle {
    task: JoinHandle<()>,
}

impl DetectorHandle {
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for DetectorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
