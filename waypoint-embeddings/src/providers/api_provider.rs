//! OpenAI-compatible embedding API provider.
//!
//! Retries with exponential backoff. After all retries fail the provider
//! reports itself unavailable for a cooldown period so the engine stops
//! paying the timeout on every request.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use waypoint_core::config::defaults::{self, DEFAULT_PROVIDER_COOLDOWN_SECS};
use waypoint_core::config::EndpointConfig;
use waypoint_core::errors::EmbeddingError;
use waypoint_core::traits::IEmbeddingProvider;

pub struct ApiEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    dimensions: usize,
    max_retries: u32,
    /// Unix millis before which the provider reports unavailable.
    unavailable_until: AtomicI64,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    index: Option<usize>,
    embedding: Vec<f32>,
}

impl ApiEmbeddingProvider {
    pub fn new(config: &EndpointConfig, api_key: String, dimensions: usize, timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build tuned HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self {
            client,
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            model: config
                .model_or(defaults::DEFAULT_EMBEDDING_MODEL)
                .to_string(),
            api_key,
            dimensions,
            max_retries: config.max_retries,
            unavailable_until: AtomicI64::new(0),
        }
    }

    async fn request_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if !self.is_available() {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.name().to_string(),
            });
        }

        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
                debug!(attempt, "retrying embedding request");
            }

            match self.send_request(texts).await {
                Ok(embeddings) => return Ok(embeddings),
                Err(e) => {
                    warn!(attempt, error = %e, "embedding request failed");
                    last_err = Some(e);
                }
            }
        }

        let until = Utc::now().timestamp_millis() + (DEFAULT_PROVIDER_COOLDOWN_SECS as i64) * 1000;
        self.unavailable_until.store(until, Ordering::Relaxed);
        Err(last_err.unwrap_or_else(|| EmbeddingError::InferenceFailed {
            reason: "all retries exhausted".to_string(),
        }))
    }

    async fn send_request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
                dimensions: self.dimensions,
            })
            .send()
            .await
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("HTTP error: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("API returned {status}: {body}"),
            });
        }

        let mut resp: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InferenceFailed {
                    reason: format!("JSON parse error: {e}"),
                })?;

        if resp.data.len() != texts.len() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("expected {} embeddings, got {}", texts.len(), resp.data.len()),
            });
        }
        resp.data.sort_by_key(|d| d.index.unwrap_or(usize::MAX));

        resp.data
            .into_iter()
            .map(|d| {
                if d.embedding.len() == self.dimensions {
                    Ok(d.embedding)
                } else {
                    Err(EmbeddingError::DimensionMismatch {
                        expected: self.dimensions,
                        actual: d.embedding.len(),
                    })
                }
            })
            .collect()
    }

    /// Clear the cooldown, e.g. after a configuration change.
    pub fn reset_availability(&self) {
        self.unavailable_until.store(0, Ordering::Relaxed);
    }
}

#[async_trait]
impl IEmbeddingProvider for ApiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let results = self.request_embeddings(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InferenceFailed {
                reason: "empty response".to_string(),
            })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request_embeddings(texts).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        Utc::now().timestamp_millis() >= self.unavailable_until.load(Ordering::Relaxed)
    }
}
