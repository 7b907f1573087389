//! Concurrency-capped GET execution.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use crate::config::PipelineConfig;
use crate::error::FetchError;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::request::RequestSpec;

/// Executes request specs through a shared [`HttpClient`], never running
/// more than `max_concurrency` requests at once. Callers past the limit wait
/// for a free slot. There is no retry.
#[derive(Clone)]
pub struct BoundedFetcher {
    client: Arc<dyn HttpClient>,
    slots: Arc<Semaphore>,
    timeout: Duration,
}

impl BoundedFetcher {
    pub fn new(client: Arc<dyn HttpClient>, max_concurrency: usize, timeout: Duration) -> Self {
        Self {
            client,
            slots: Arc::new(Semaphore::new(max_concurrency.max(1))),
            timeout,
        }
    }

    pub fn from_config(client: Arc<dyn HttpClient>, config: &PipelineConfig) -> Self {
        Self::new(client, config.max_concurrency, config.request_timeout)
    }

    /// Free slots right now.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }

    /// Single GET. Any HTTP status comes back as a response (non-2xx is only
    /// logged louder); transport failures are errors.
    pub async fn fetch(&self, spec: &RequestSpec) -> Result<HttpResponse, FetchError> {
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let request = HttpRequest::get(spec.url.clone())
            .with_query(spec.params.clone())
            .with_timeout_ms(timeout_ms);

        let response = self.client.execute(request).await.map_err(|source| {
            if source.is_timeout() {
                FetchError::Timeout {
                    url: spec.url.clone(),
                    timeout_ms,
                }
            } else {
                FetchError::Transport {
                    url: spec.url.clone(),
                    source,
                }
            }
        })?;

        let interval = spec.param("interval").unwrap_or_default();
        if response.is_success() {
            debug!(
                "{:8} - {} - {}",
                spec.tail(),
                response.status,
                interval
            );
        } else {
            warn!(
                "{:8} - {} - {}",
                spec.tail(),
                response.status,
                interval
            );
        }

        Ok(response)
    }

    /// [`Self::fetch`] inside a concurrency slot, bounded by the request
    /// timeout. A timeout only affects this request.
    pub async fn bounded_fetch(&self, spec: &RequestSpec) -> Result<HttpResponse, FetchError> {
        let _permit = self.slots.acquire().await.map_err(|_| FetchError::Closed)?;

        let outcome = match tokio::time::timeout(self.timeout, self.fetch(spec)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::Timeout {
                url: spec.url.clone(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        if let Err(error) = &outcome {
            error!(url = %spec.url, %error, "request failed");
        }
        outcome
    }

    /// Bounded fetch whose body is decoded as JSON.
    pub async fn bounded_fetch_json<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
    ) -> Result<T, FetchError> {
        let response = self.bounded_fetch(spec).await?;
        serde_json::from_str(&response.body).map_err(|e| FetchError::Decode {
            url: spec.url.clone(),
            message: e.to_string(),
        })
    }
}
