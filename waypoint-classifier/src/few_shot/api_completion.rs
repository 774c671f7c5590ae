//! OpenAI-compatible chat completion provider.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use waypoint_core::config::defaults::{self, DEFAULT_PROVIDER_COOLDOWN_SECS};
use waypoint_core::config::EndpointConfig;
use waypoint_core::errors::CompletionError;
use waypoint_core::traits::{ChatMessage, CompletionOptions, ICompletionProvider};

pub struct ApiCompletionProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_retries: u32,
    /// Unix millis before which the provider reports unavailable.
    unavailable_until: AtomicI64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// A failed attempt and whether another one may succeed.
struct Attempt {
    error: CompletionError,
    retry: bool,
}

impl ApiCompletionProvider {
    pub fn new(config: &EndpointConfig, api_key: String, timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build tuned HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config
                .model_or(defaults::DEFAULT_COMPLETION_MODEL)
                .to_string(),
            api_key,
            max_retries: config.max_retries,
            unavailable_until: AtomicI64::new(0),
        }
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<String, Attempt> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Attempt {
                error: self.unavailable(format!("HTTP error: {e}")),
                retry: true,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Attempt {
                error: self.unavailable(format!("API returned {status}: {body}")),
                retry: should_retry(status),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| Attempt {
            error: CompletionError::MalformedResponse {
                reason: format!("JSON parse error: {e}"),
            },
            retry: false,
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Attempt {
                error: CompletionError::EmptyCompletion {
                    provider: self.model.clone(),
                },
                retry: false,
            })
    }

    fn unavailable(&self, reason: String) -> CompletionError {
        CompletionError::ProviderUnavailable {
            provider: self.model.clone(),
            reason,
        }
    }

    /// Clear the cooldown, e.g. after a configuration change.
    pub fn reset_availability(&self) {
        self.unavailable_until.store(0, Ordering::Relaxed);
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[async_trait]
impl ICompletionProvider for ApiCompletionProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        if !self.is_available() {
            return Err(self.unavailable("cooling down after repeated failures".to_string()));
        }

        let request = ChatRequest {
            model: options.model.as_deref().unwrap_or(&self.model),
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let mut attempt = 0;
        loop {
            match self.send(&request).await {
                Ok(content) => return Ok(content),
                Err(Attempt { error, retry }) => {
                    warn!(attempt, error = %error, "completion request failed");
                    if !retry {
                        return Err(error);
                    }
                    if attempt >= self.max_retries {
                        let until = Utc::now().timestamp_millis()
                            + (DEFAULT_PROVIDER_COOLDOWN_SECS as i64) * 1000;
                        self.unavailable_until.store(until, Ordering::Relaxed);
                        return Err(error);
                    }
                }
            }
            attempt += 1;
            let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
            tokio::time::sleep(delay).await;
            debug!(attempt, "retrying completion request");
        }
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        Utc::now().timestamp_millis() >= self.unavailable_until.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: &str) -> ApiCompletionProvider {
        let endpoint = EndpointConfig {
            base_url: base_url.to_string(),
            model: "test-model".to_string(),
            max_retries: 0,
            ..Default::default()
        };
        ApiCompletionProvider::new(&endpoint, "test-key".to_string(), 200)
    }

    fn options() -> CompletionOptions {
        CompletionOptions {
            model: None,
            temperature: 0.1,
            max_tokens: 200,
        }
    }

    #[test]
    fn endpoint_joins_path() {
        let p = provider("http://localhost:9/v1/");
        assert_eq!(p.endpoint, "http://localhost:9/v1/chat/completions");
        assert_eq!(p.name(), "test-model");
    }

    #[test]
    fn retries_only_transient_statuses() {
        assert!(should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(should_retry(StatusCode::BAD_GATEWAY));
        assert!(!should_retry(StatusCode::UNAUTHORIZED));
        assert!(!should_retry(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn unreachable_endpoint_enters_cooldown() {
        let p = provider("http://127.0.0.1:9/v1");
        let messages = [ChatMessage::user("hello")];
        let err = p.complete(&messages, &options()).await.unwrap_err();
        assert!(matches!(err, CompletionError::ProviderUnavailable { .. }));
        assert!(!p.is_available());

        p.reset_availability();
        assert!(p.is_available());
    }

    #[test]
    fn request_serialises_messages() {
        let messages = [ChatMessage::system("s"), ChatMessage::user("u")];
        let body = serde_json::to_value(ChatRequest {
            model: "m",
            messages: &messages,
            temperature: 0.1,
            max_tokens: 200,
        })
        .unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "u");
        assert_eq!(body["max_tokens"], 200);
    }
}
