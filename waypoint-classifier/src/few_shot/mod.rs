//! Few-shot completion tier: the costliest classifier, consulted only when
//! the cheaper tiers disagree or are unsure.
//!
//! Never returns an error. Provider failure, timeout, cancellation and
//! malformed replies all collapse into the safe `ask`/0.3 classification
//! with `fallback = true`.

mod api_completion;
mod parse;
mod prompt;

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use waypoint_core::cancellation::{bounded, CancellationToken};
use waypoint_core::config::FewShotConfig;
use waypoint_core::intent::IntentClassification;
use waypoint_core::models::RouterContext;
use waypoint_core::traits::{CompletionOptions, ICompletionProvider};
use waypoint_embeddings::EmbeddingStore;

pub use api_completion::ApiCompletionProvider;
pub use parse::{extract_json_object, parse_reply, ParseFailure, ParsedClassification};
pub use prompt::{system_message, user_message};

/// Result of one few-shot classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FewShotOutcome {
    pub classification: IntentClassification,
    /// Model-supplied reasoning, or the failure that forced the fallback.
    pub reasoning: String,
    pub examples_used: usize,
    pub processing_time_ms: u64,
    /// True when the safe default was returned instead of a model answer.
    pub fallback: bool,
    /// Whether the returned confidence reached the requested threshold.
    pub meets_threshold: bool,
}

pub struct FewShotClassifier {
    store: Arc<EmbeddingStore>,
    provider: Option<Arc<dyn ICompletionProvider>>,
    config: FewShotConfig,
}

impl FewShotClassifier {
    pub fn new(
        store: Arc<EmbeddingStore>,
        provider: Option<Arc<dyn ICompletionProvider>>,
        config: FewShotConfig,
    ) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn config(&self) -> &FewShotConfig {
        &self.config
    }

    /// True when the mean of the cheaper tiers' confidence is below the
    /// configured threshold.
    pub fn should_use_meta_classifier(&self, classifier_conf: f64, embedding_conf: f64) -> bool {
        (classifier_conf + embedding_conf) / 2.0 < self.config.confidence_threshold
    }

    /// Classify `query`, embedding it to find prompt examples. A `None`
    /// threshold means the configured one.
    pub async fn classify(
        &self,
        query: &str,
        context: &RouterContext,
        confidence_threshold: Option<f64>,
        cancel: Option<&CancellationToken>,
    ) -> FewShotOutcome {
        let vector = self.store.embed(query).await;
        self.classify_embedded(query, &vector, context, confidence_threshold, cancel)
            .await
    }

    /// Classify with a precomputed query embedding.
    pub async fn classify_embedded(
        &self,
        query: &str,
        vector: &[f32],
        context: &RouterContext,
        confidence_threshold: Option<f64>,
        cancel: Option<&CancellationToken>,
    ) -> FewShotOutcome {
        let started = Instant::now();
        let threshold = confidence_threshold.unwrap_or(self.config.confidence_threshold);

        let Some(provider) = self.provider.as_ref() else {
            return fallback(started, 0, "no completion provider configured".to_string());
        };

        let examples: Vec<_> = self
            .store
            .search_by_vector(vector, self.config.max_examples, None)
            .into_iter()
            .filter(|e| e.similarity > 0.0)
            .collect();
        let messages = [
            prompt::system_message(),
            prompt::user_message(query, &examples, context),
        ];
        let options = CompletionOptions {
            model: None,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let timeout = Duration::from_millis(self.config.timeout_ms);
        let reply = match bounded(provider.complete(&messages, &options), timeout, cancel).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!(provider = provider.name(), error = %e, "few-shot completion failed");
                return fallback(started, examples.len(), format!("completion failed: {e}"));
            }
            Err(interrupted) => {
                warn!(provider = provider.name(), reason = %interrupted, "few-shot completion interrupted");
                return fallback(started, examples.len(), format!("completion {interrupted}"));
            }
        };

        match parse::parse_reply(&reply) {
            Ok(parsed) => {
                let classification =
                    IntentClassification::new(parsed.intent, parsed.confidence, parsed.slots);
                let meets_threshold = classification.confidence >= threshold;
                debug!(
                    intent = %classification.intent,
                    confidence = classification.confidence,
                    examples = examples.len(),
                    meets_threshold,
                    "few-shot classification"
                );
                FewShotOutcome {
                    classification,
                    reasoning: parsed.reasoning.unwrap_or_default(),
                    examples_used: examples.len(),
                    processing_time_ms: elapsed_ms(started),
                    fallback: false,
                    meets_threshold,
                }
            }
            Err(e) => {
                warn!(error = %e, "few-shot reply rejected");
                fallback(started, examples.len(), format!("invalid reply: {e}"))
            }
        }
    }
}

fn fallback(started: Instant, examples_used: usize, reasoning: String) -> FewShotOutcome {
    FewShotOutcome {
        classification: IntentClassification::safe_fallback(),
        reasoning,
        examples_used,
        processing_time_ms: elapsed_ms(started),
        fallback: true,
        meets_threshold: false,
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
