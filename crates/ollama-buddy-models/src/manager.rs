//! Connection manager for the local model server
//!
//! Owns the active endpoint, the connectivity flag, the model list and the
//! current selection. State moves through [`ConnectionStatus`]:
//!
//! - `refresh_models` lists models at the active endpoint
//! - `set_endpoint` stores a new endpoint and refreshes against it
//! - `discover_alternates` scans the fallback list in order and commits the
//!   first endpoint that answers with a model listing
//!
//! Every refresh takes a sequence number when it is issued. A response only
//! commits if its number is still the latest issued, so a slow periodic
//! refresh can never overwrite the result of a newer user action.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use ollama_buddy_common::{BuddyEvent, ConnectionStatus, EventBus};
use ollama_buddy_config::ConnectionConfig;

use crate::{
    error::{LocalModelError, ProbeError},
    models::{default_models, ModelDescriptor},
    probe::{EndpointProbe, HttpProbe, ProbeResult},
    Result,
};

/// Snapshot of the connection state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionState {
    /// Active endpoint, stored verbatim
    pub endpoint: String,
    pub status: ConnectionStatus,
    /// Outcome of the last committed refresh
    pub connected: bool,
    pub models: Vec<ModelDescriptor>,
    pub selected_model: Option<ModelDescriptor>,
    /// Error of the last committed failure, cleared on success
    pub last_error: Option<ProbeError>,
}

impl ConnectionState {
    fn initial(endpoint: String) -> Self {
        let models = default_models();
        let selected_model = models.first().cloned();
        Self {
            endpoint,
            status: ConnectionStatus::Unconnected,
            connected: false,
            models,
            selected_model,
            last_error: None,
        }
    }
}

/// Result of a single refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Models were listed and committed
    Connected { endpoint: String, model_count: usize },
    /// The request failed; prior models were kept
    Failed(ProbeError),
    /// A newer refresh was issued before this one finished; nothing committed
    Superseded { sequence: u64, latest: u64 },
}

impl RefreshOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, RefreshOutcome::Connected { .. })
    }
}

/// Result of a fallback endpoint scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// `endpoint` listed models; it was committed with that listing
    Found {
        endpoint: String,
        /// Candidates probed, in order, including the one that answered
        probed: Vec<String>,
        refresh: RefreshOutcome,
    },
    /// No candidate answered with a model listing
    Exhausted { failures: Vec<ProbeError> },
    /// A newer refresh or endpoint change was issued during the scan; nothing committed
    Superseded { sequence: u64, latest: u64 },
}

struct Inner {
    probe: Arc<dyn EndpointProbe>,
    state: RwLock<ConnectionState>,
    issued: AtomicU64,
    fallback_endpoints: Vec<String>,
    request_timeout: Duration,
    probe_timeout: Duration,
    events: EventBus,
}

/// Cloneable handle to the shared connection state
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

impl ConnectionManager {
    /// Create a manager that probes over HTTP
    pub fn new(config: &ConnectionConfig, events: EventBus) -> Result<Self> {
        let probe = HttpProbe::new()?;
        Ok(Self::with_probe(Arc::new(probe), config, events))
    }

    /// Create a manager with a custom probe implementation
    pub fn with_probe(
        probe: Arc<dyn EndpointProbe>,
        config: &ConnectionConfig,
        events: EventBus,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                probe,
                state: RwLock::new(ConnectionState::initial(config.endpoint.clone())),
                issued: AtomicU64::new(0),
                fallback_endpoints: config.fallback_endpoints.clone(),
                request_timeout: config.request_timeout(),
                probe_timeout: config.probe_timeout(),
                events,
            }),
        }
    }

    /// Copy of the current state
    pub fn state(&self) -> ConnectionState {
        self.inner.state.read().clone()
    }

    pub fn endpoint(&self) -> String {
        self.inner.state.read().endpoint.clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.inner.state.read().status
    }

    pub fn is_connected(&self) -> bool {
        self.inner.state.read().connected
    }

    pub fn models(&self) -> Vec<ModelDescriptor> {
        self.inner.state.read().models.clone()
    }

    pub fn selected_model(&self) -> Option<ModelDescriptor> {
        self.inner.state.read().selected_model.clone()
    }

    pub fn fallback_endpoints(&self) -> &[String] {
        &self.inner.fallback_endpoints
    }

    /// Sequence number of the most recently issued refresh
    pub fn latest_sequence(&self) -> u64 {
        self.inner.issued.load(Ordering::SeqCst)
    }

    fn next_sequence(&self) -> u64 {
        self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Select a model from the current list
    ///
    /// Unknown ids are rejected and the selection is left unchanged.
    pub fn set_selected_model(&self, model_id: &str) -> Result<ModelDescriptor> {
        let mut state = self.inner.state.write();
        let model = state
            .models
            .iter()
            .find(|m| m.id == model_id)
            .cloned()
            .ok_or_else(|| LocalModelError::ModelNotFound(model_id.to_string()))?;

        debug!("Selected model: {}", model.id);
        state.selected_model = Some(model.clone());
        Ok(model)
    }

    /// List models at the active endpoint and commit the result
    ///
    /// Failures are absorbed into state: `connected` drops to false and the
    /// previous model list is kept.
    pub async fn refresh_models(&self) -> RefreshOutcome {
        let sequence = self.next_sequence();
        self.inner.state.write().status = ConnectionStatus::Connecting;
        self.run_refresh(sequence).await
    }

    /// Store a new endpoint verbatim and refresh against it
    pub async fn set_endpoint(&self, endpoint: impl Into<String>) -> RefreshOutcome {
        let endpoint = endpoint.into();
        let sequence = self.next_sequence();
        {
            let mut state = self.inner.state.write();
            info!("Endpoint changed: {} -> {}", state.endpoint, endpoint);
            state.endpoint = endpoint;
            state.status = ConnectionStatus::Connecting;
        }
        self.run_refresh(sequence).await
    }

    /// Scan the fallback endpoints in order and commit the first that lists models
    ///
    /// Each candidate gets one listing request with the short probe timeout;
    /// an answer that is not a model listing counts as a miss. The scan stops
    /// without committing once a newer refresh or endpoint change is issued.
    pub async fn discover_alternates(&self) -> DiscoveryOutcome {
        let sequence = self.next_sequence();
        self.inner.state.write().status = ConnectionStatus::Connecting;

        let mut probed = Vec::with_capacity(self.inner.fallback_endpoints.len());
        let mut failures = Vec::new();

        for candidate in &self.inner.fallback_endpoints {
            probed.push(candidate.clone());
            let result = self
                .inner
                .probe
                .fetch_models(candidate, self.inner.probe_timeout)
                .await;

            let latest = self.latest_sequence();
            if latest != sequence {
                debug!("Discovery #{} superseded by #{}", sequence, latest);
                return DiscoveryOutcome::Superseded { sequence, latest };
            }

            match result {
                Ok(models) => {
                    info!("Found model server at {}", candidate);
                    return match self.commit(sequence, Some(candidate.as_str()), Ok(models)) {
                        RefreshOutcome::Superseded { sequence, latest } => {
                            DiscoveryOutcome::Superseded { sequence, latest }
                        }
                        refresh => DiscoveryOutcome::Found {
                            endpoint: candidate.clone(),
                            probed,
                            refresh,
                        },
                    };
                }
                Err(e) => {
                    debug!("Fallback candidate failed: {}", e);
                    failures.push(e);
                }
            }
        }

        warn!(
            "No fallback endpoint answered ({} tried)",
            self.inner.fallback_endpoints.len()
        );
        let error = failures.last().cloned().unwrap_or_else(|| ProbeError::Network {
            endpoint: self.endpoint(),
            message: "no fallback endpoints configured".to_string(),
        });
        if let RefreshOutcome::Superseded { sequence, latest } =
            self.commit(sequence, None, Err(error))
        {
            return DiscoveryOutcome::Superseded { sequence, latest };
        }

        DiscoveryOutcome::Exhausted { failures }
    }

    /// Probe the active endpoint without touching state
    pub async fn check_endpoint(&self) -> ProbeResult<()> {
        let endpoint = self.endpoint();
        self.inner
            .probe
            .probe(&endpoint, self.inner.request_timeout)
            .await
    }

    async fn run_refresh(&self, sequence: u64) -> RefreshOutcome {
        let endpoint = self.endpoint();
        debug!("Refresh #{} against {}", sequence, endpoint);

        let result = self
            .inner
            .probe
            .fetch_models(&endpoint, self.inner.request_timeout)
            .await;

        self.commit(sequence, None, result)
    }

    /// Commit a listing result if `sequence` is still the latest issued
    ///
    /// `endpoint` replaces the active endpoint in the same critical section.
    fn commit(
        &self,
        sequence: u64,
        endpoint: Option<&str>,
        result: ProbeResult<Vec<ModelDescriptor>>,
    ) -> RefreshOutcome {
        let mut state = self.inner.state.write();

        let latest = self.latest_sequence();
        if sequence != latest {
            debug!("Discarding refresh #{} superseded by #{}", sequence, latest);
            return RefreshOutcome::Superseded { sequence, latest };
        }

        if let Some(endpoint) = endpoint {
            info!("Endpoint changed: {} -> {}", state.endpoint, endpoint);
            state.endpoint = endpoint.to_string();
        }

        let outcome = match result {
            Ok(models) => {
                let selected = reconcile_selection(state.selected_model.as_ref(), &models);
                state.selected_model = selected;
                state.models = models;
                state.connected = true;
                state.status = ConnectionStatus::Connected;
                state.last_error = None;
                info!(
                    "Connected to {} ({} models)",
                    state.endpoint,
                    state.models.len()
                );
                RefreshOutcome::Connected {
                    endpoint: state.endpoint.clone(),
                    model_count: state.models.len(),
                }
            }
            Err(e) => {
                warn!("Refresh against {} failed: {}", state.endpoint, e);
                state.connected = false;
                state.status = ConnectionStatus::ConnectionFailed;
                state.last_error = Some(e.clone());
                RefreshOutcome::Failed(e)
            }
        };

        let event = BuddyEvent::ConnectionChanged {
            endpoint: state.endpoint.clone(),
            status: state.status,
            model_count: state.models.len(),
        };
        drop(state);
        self.inner.events.publish(event);

        outcome
    }
}

/// Keep the selection pointing into `models`
///
/// A vanished selection falls back to the first model, or none for an empty list.
fn reconcile_selection(
    selected: Option<&ModelDescriptor>,
    models: &[ModelDescriptor],
) -> Option<ModelDescriptor> {
    match selected {
        Some(current) => match models.iter().find(|m| m.id == current.id) {
            Some(fresh) => Some(fresh.clone()),
            None => {
                let replacement = models.first().cloned();
                warn!(
                    "Selected model {} no longer listed, now {:?}",
                    current.id,
                    replacement.as_ref().map(|m| m.id.as_str())
                );
                replacement
            }
        },
        None => models.first().cloned(),
    }
}
