//! Cross-crate scenarios: detection over HTTP, settings and notifications

use std::time::Duration;

use ollama_buddy_common::BuddyEvent;
use ollama_buddy_config::BuddyConfig;
use ollama_buddy_context::{BuddyContext, OllamaDetector};
use ollama_buddy_mcp::{ConfigValue, Delivery, ProviderConfig};
use ollama_buddy_models::{ConnectionStatus, DiscoveryOutcome};
use serde_json::json;

const DEAD: [&str; 3] = [
    "http://127.0.0.1:1",
    "http://127.0.0.1:2",
    "http://127.0.0.1:3",
];

fn listing() -> String {
    json!({
        "models": [
            {
                "name": "llama3:8b",
                "size": 4661224676u64,
                "details": {
                    "family": "llama",
                    "parameter_size": "8B",
                    "quantization_level": "Q4_0"
                }
            },
            { "name": "llava:7b", "size": 4733363377u64 }
        ]
    })
    .to_string()
}

async fn ollama_server() -> mockito::ServerGuard {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing())
        .expect_at_least(1)
        .create_async()
        .await;
    server
}

fn config(endpoint: &str, fallbacks: Vec<String>) -> BuddyConfig {
    let mut config = BuddyConfig::default();
    config.connection.endpoint = endpoint.to_string();
    config.connection.fallback_endpoints = fallbacks;
    config.connection.request_timeout_secs = 5;
    config.connection.probe_timeout_secs = 1;
    config
}

async fn next_toast(
    rx: &mut tokio::sync::broadcast::Receiver<BuddyEvent>,
    wanted: &str,
) -> Option<String> {
    let wait = async {
        loop {
            match rx.recv().await {
                Ok(BuddyEvent::Toast { title, description }) if title == wanted => {
                    return Some(description)
                }
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(10), wait)
        .await
        .ok()
        .flatten()
}

#[tokio::test]
async fn test_discovery_finds_server_behind_dead_candidates() {
    let server = ollama_server().await;
    let mut fallbacks: Vec<String> = DEAD[..2].iter().map(|e| e.to_string()).collect();
    fallbacks.push(server.url());
    let context = BuddyContext::new(config(DEAD[2], fallbacks)).unwrap();

    let detection = OllamaDetector::detect(&context).await;

    match detection.discovery {
        Some(DiscoveryOutcome::Found {
            ref endpoint,
            ref probed,
            ..
        }) => {
            assert_eq!(endpoint, &server.url());
            assert_eq!(probed.len(), 3);
        }
        ref other => panic!("expected discovery to succeed, got {:?}", other),
    }
    assert!(detection.is_connected());

    let state = context.connection().state();
    assert_eq!(state.endpoint, server.url());
    assert_eq!(state.status, ConnectionStatus::Connected);
    let ids: Vec<_> = state.models.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["llama3:8b", "llava:7b"]);
    assert_eq!(state.models[0].size_label, "4.3 GB");
    assert!(state.models[1].has_capability("vision"));
    assert_eq!(
        state.selected_model.map(|m| m.id),
        Some("llama3:8b".to_string())
    );
}

#[tokio::test]
async fn test_detector_announces_models_found() {
    let server = ollama_server().await;
    let context = BuddyContext::new(config(&server.url(), vec![DEAD[0].to_string()])).unwrap();
    let mut rx = context.subscribe();

    let handle = OllamaDetector::start(context.clone());
    let description = next_toast(&mut rx, "Connected to Ollama").await;
    handle.stop();

    assert_eq!(
        description.as_deref(),
        Some("Found 2 models on your system.")
    );
    assert!(context.connection().is_connected());
}

#[tokio::test]
async fn test_settings_then_connection_test() {
    let server = ollama_server().await;
    let context = BuddyContext::new(config(DEAD[0], vec![DEAD[1].to_string()])).unwrap();
    let mut rx = context.subscribe();

    assert!(context.test_connection().await.is_err());
    assert!(next_toast(&mut rx, "Connection failed").await.is_some());

    let outcome = context.apply_settings(server.url()).await;
    assert!(outcome.is_connected());
    assert!(next_toast(&mut rx, "Settings saved").await.is_some());

    assert!(context.test_connection().await.is_ok());
    assert!(next_toast(&mut rx, "Connection successful").await.is_some());
}

#[tokio::test]
async fn test_notifications_follow_provider_state() {
    let context = BuddyContext::new(config(DEAD[0], vec![DEAD[1].to_string()])).unwrap();
    let mut rx = context.subscribe();

    context.set_provider_enabled("notification", false);
    assert_eq!(context.notify("Build failed", "3 errors"), Delivery::Suppressed);

    let mut partial = ProviderConfig::new();
    partial.insert(
        "device_token".to_string(),
        ConfigValue::from("phone-1234"),
    );
    assert!(context.update_provider_config("notification", partial));
    context.set_provider_enabled("notification", true);

    assert_eq!(context.notify("Build failed", "3 errors"), Delivery::Delivered);

    let mut delivered = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let BuddyEvent::Notification { title, message, .. } = event {
            delivered.push((title, message));
        }
    }
    assert_eq!(
        delivered,
        vec![("Build failed".to_string(), "3 errors".to_string())]
    );
    assert_eq!(
        context
            .registry()
            .get_config("notification", "device_token")
            .unwrap()
            .as_text(),
        Some("phone-1234")
    );
}
