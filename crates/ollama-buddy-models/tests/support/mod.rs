//! Scripted probe used by the connection manager tests

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ollama_buddy_models::probe::ProbeResult;
use ollama_buddy_models::{EndpointProbe, ModelDescriptor, ProbeError};
use parking_lot::Mutex;
use tokio::sync::Notify;

/// Which trait method was called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Probe,
    Fetch,
}

/// Gate holding a listing request until the test releases it
#[derive(Clone, Default)]
pub struct Gate {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// Answers per endpoint; endpoints without a script answer HTTP 503
#[derive(Default)]
pub struct ScriptedProbe {
    listings: Mutex<HashMap<String, Vec<ModelDescriptor>>>,
    malformed: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, Gate>>,
    calls: Mutex<Vec<(Call, String, Duration)>>,
}

impl ScriptedProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `endpoint` answer with the given model ids
    pub fn serve(&self, endpoint: &str, ids: &[&str]) {
        self.listings
            .lock()
            .insert(endpoint.to_string(), ids.iter().map(|id| model(id)).collect());
    }

    /// Make `endpoint` answer 2xx with a body that is not a model listing
    pub fn serve_malformed(&self, endpoint: &str) {
        self.malformed.lock().insert(endpoint.to_string());
    }

    /// Stop answering at `endpoint`
    pub fn take_down(&self, endpoint: &str) {
        self.listings.lock().remove(endpoint);
    }

    /// Hold listing requests against `endpoint` until released
    pub fn gate(&self, endpoint: &str) -> Gate {
        let gate = Gate::default();
        self.gates.lock().insert(endpoint.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<(Call, String, Duration)> {
        self.calls.lock().clone()
    }

    /// Endpoints hit by `probe`, in order
    pub fn probed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(call, _, _)| *call == Call::Probe)
            .map(|(_, endpoint, _)| endpoint)
            .collect()
    }

    /// Endpoints hit by `fetch_models`, in order
    pub fn fetched(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(call, _, _)| *call == Call::Fetch)
            .map(|(_, endpoint, _)| endpoint)
            .collect()
    }

    fn answer(&self, endpoint: &str) -> ProbeResult<Vec<ModelDescriptor>> {
        if self.malformed.lock().contains(endpoint) {
            return Err(ProbeError::Parse {
                endpoint: endpoint.to_string(),
                message: "missing field `models`".to_string(),
            });
        }
        self.listings
            .lock()
            .get(endpoint)
            .cloned()
            .ok_or_else(|| ProbeError::BadStatus {
                endpoint: endpoint.to_string(),
                status: 503,
            })
    }
}

#[async_trait]
impl EndpointProbe for ScriptedProbe {
    async fn probe(&self, endpoint: &str, timeout: Duration) -> ProbeResult<()> {
        self.calls
            .lock()
            .push((Call::Probe, endpoint.to_string(), timeout));
        if self.malformed.lock().contains(endpoint) {
            return Ok(());
        }
        self.answer(endpoint).map(|_| ())
    }

    async fn fetch_models(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> ProbeResult<Vec<ModelDescriptor>> {
        self.calls
            .lock()
            .push((Call::Fetch, endpoint.to_string(), timeout));

        let gate = self.gates.lock().get(endpoint).cloned();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        self.answer(endpoint)
    }
}

pub fn model(id: &str) -> ModelDescriptor {
    ModelDescriptor {
        id: id.to_string(),
        name: id.to_string(),
        size_label: "unknown".to_string(),
        description: "scripted".to_string(),
        installed: true,
        capabilities: ["chat", "code", "completion"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
    }
}
