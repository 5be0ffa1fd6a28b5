//! Bounded-time checks against a model server endpoint
//!
//! [`EndpointProbe`] is the seam between the connection manager and the
//! network. [`HttpProbe`] talks to a real server over HTTP; tests substitute
//! scripted implementations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    error::{LocalModelError, ProbeError},
    models::{parse_listing, ModelDescriptor},
    Result,
};

/// Path listing the models a server has installed
pub const TAGS_PATH: &str = "/api/tags";

/// Default pool idle timeout (90 seconds)
const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Default TCP keep-alive interval (60 seconds)
const DEFAULT_TCP_KEEPALIVE_SECS: u64 = 60;

/// Result of a single probe or listing request
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// A single request against an endpoint, never retried internally
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    /// Succeeds when `GET {endpoint}/api/tags` answers 2xx within `timeout`
    async fn probe(&self, endpoint: &str, timeout: Duration) -> ProbeResult<()>;

    /// Fetch and parse the model listing of `endpoint`
    async fn fetch_models(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> ProbeResult<Vec<ModelDescriptor>>;
}

/// Build the listing URL for an endpoint stored verbatim
pub fn tags_url(endpoint: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), TAGS_PATH)
}

/// HTTP implementation of [`EndpointProbe`] backed by a pooled reqwest client
#[derive(Clone)]
pub struct HttpProbe {
    client: Arc<Client>,
}

impl HttpProbe {
    /// Create a probe with connection pooling and TCP keep-alive
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT_SECS))
            .tcp_keepalive(Duration::from_secs(DEFAULT_TCP_KEEPALIVE_SECS))
            .build()
            .map_err(|e| {
                LocalModelError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    async fn get_tags(&self, endpoint: &str, timeout: Duration) -> ProbeResult<reqwest::Response> {
        let url = tags_url(endpoint);
        debug!("GET {} (timeout {:?})", url, timeout);

        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} answered HTTP {}", url, status);
            return Err(ProbeError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl EndpointProbe for HttpProbe {
    async fn probe(&self, endpoint: &str, timeout: Duration) -> ProbeResult<()> {
        self.get_tags(endpoint, timeout).await.map(|_| ())
    }

    async fn fetch_models(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> ProbeResult<Vec<ModelDescriptor>> {
        let response = self.get_tags(endpoint, timeout).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ProbeError::from_reqwest(endpoint, e))?;

        parse_listing(&body).map_err(|e| {
            warn!("Failed to parse tags response from {}: {}", endpoint, e);
            ProbeError::Parse {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
        })
    }
}
