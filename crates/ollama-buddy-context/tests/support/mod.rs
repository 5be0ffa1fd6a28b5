//! Shared fixtures for the context and detector tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ollama_buddy_common::BuddyEvent;
use ollama_buddy_config::BuddyConfig;
use ollama_buddy_context::BuddyContext;
use ollama_buddy_models::probe::ProbeResult;
use ollama_buddy_models::{EndpointProbe, ModelDescriptor, ProbeError};
use parking_lot::Mutex;
use tokio::sync::broadcast::Receiver;

pub const PRIMARY: &str = "http://primary:11434";
pub const FALLBACKS: [&str; 3] = [
    "http://fallback-a:11434",
    "http://fallback-b:11434",
    "http://fallback-c:11434",
];

/// Probe answering from an in-memory table; unknown endpoints are refused
#[derive(Default)]
pub struct FakeProbe {
    listings: Mutex<HashMap<String, Vec<ModelDescriptor>>>,
    fetches: Mutex<Vec<String>>,
}

impl FakeProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn serve(&self, endpoint: &str, ids: &[&str]) {
        self.listings
            .lock()
            .insert(endpoint.to_string(), ids.iter().map(|id| model(id)).collect());
    }

    pub fn take_down(&self, endpoint: &str) {
        self.listings.lock().remove(endpoint);
    }

    /// Endpoints hit by listing requests, in order
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().clone()
    }

    fn answer(&self, endpoint: &str) -> ProbeResult<Vec<ModelDescriptor>> {
        self.listings
            .lock()
            .get(endpoint)
            .cloned()
            .ok_or_else(|| ProbeError::Network {
                endpoint: endpoint.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

#[async_trait]
impl EndpointProbe for FakeProbe {
    async fn probe(&self, endpoint: &str, _timeout: Duration) -> ProbeResult<()> {
        self.answer(endpoint).map(|_| ())
    }

    async fn fetch_models(
        &self,
        endpoint: &str,
        _timeout: Duration,
    ) -> ProbeResult<Vec<ModelDescriptor>> {
        self.fetches.lock().push(endpoint.to_string());
        self.answer(endpoint)
    }
}

pub fn model(id: &str) -> ModelDescriptor {
    ModelDescriptor {
        id: id.to_string(),
        name: id.to_string(),
        size_label: "4.1 GB".to_string(),
        description: "test model".to_string(),
        installed: true,
        capabilities: ["chat", "completion"].iter().map(|c| c.to_string()).collect(),
    }
}

pub fn test_config() -> BuddyConfig {
    let mut config = BuddyConfig::default();
    config.connection.endpoint = PRIMARY.to_string();
    config.connection.fallback_endpoints = FALLBACKS.iter().map(|e| e.to_string()).collect();
    config.connection.refresh_interval_secs = 30;
    config
}

pub fn context_with(probe: &Arc<FakeProbe>) -> BuddyContext {
    BuddyContext::with_probe(test_config(), probe.clone())
}

/// Everything currently queued on the receiver
pub fn drain(rx: &mut Receiver<BuddyEvent>) -> Vec<BuddyEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn titles(events: &[BuddyEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| e.title().map(str::to_string))
        .collect()
}

pub fn notifications(events: &[BuddyEvent]) -> Vec<&BuddyEvent> {
    events
        .iter()
        .filter(|e| matches!(e, BuddyEvent::Notification { .. }))
        .collect()
}
