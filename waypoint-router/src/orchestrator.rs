//! The routing cascade.
//!
//! ```text
//! embed query once (timeout + cancellation; zero vector on failure)
//!   ├── rayon::join ── neighbour vote over labeled examples
//!   │               └─ linear classifier inference
//!   └── decide:
//!        classifier ≥ 0.8          → classifier
//!        neighbour vote ≥ 0.7      → embedding
//!        otherwise                 → meta_classifier (few-shot and/or keyword heuristic)
//! ```

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, Instrument};
use waypoint_classifier::{FewShotClassifier, LinearClassifier, LinearPrediction, TrainingMetrics};
use waypoint_core::cancellation::CancellationToken;
use waypoint_core::config::{FallbackPolicy, RouterConfig};
use waypoint_core::constants::HEURISTIC_CONFIDENCE;
use waypoint_core::errors::ClassifierError;
use waypoint_core::intent::{Intent, IntentClassification};
use waypoint_core::models::{RouterContext, RouterFeatures, RouterResponse, RoutingMethod};
use waypoint_embeddings::similarity::is_zero;
use waypoint_embeddings::{EmbeddingStore, IntentDistribution};
use waypoint_observability::metrics::{RequestOutcome, RouterMetrics, RouterMetricsCollector};
use waypoint_observability::router_span;
use waypoint_observability::tracing_setup::events;

use crate::heuristic::heuristic_intent;
use crate::slots::synthesize;

/// Winner of the third tier.
struct MetaDecision {
    intent: Intent,
    confidence: f64,
    fallback_used: bool,
    meta_invoked: bool,
    explanation: String,
}

pub struct IntentRouter {
    config: RouterConfig,
    policy: FallbackPolicy,
    store: Arc<EmbeddingStore>,
    classifier: Arc<LinearClassifier>,
    few_shot: FewShotClassifier,
    metrics: Arc<RouterMetricsCollector>,
}

impl IntentRouter {
    pub fn new(
        config: RouterConfig,
        store: Arc<EmbeddingStore>,
        classifier: Arc<LinearClassifier>,
        few_shot: FewShotClassifier,
        metrics: Arc<RouterMetricsCollector>,
    ) -> Self {
        let policy = config.effective_policy(few_shot.has_provider());
        debug!(?policy, "router fallback policy");
        Self {
            config,
            policy,
            store,
            classifier,
            few_shot,
            metrics,
        }
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn store(&self) -> &Arc<EmbeddingStore> {
        &self.store
    }

    pub fn classifier(&self) -> &Arc<LinearClassifier> {
        &self.classifier
    }

    pub async fn classify_intent(&self, query: &str, context: &RouterContext) -> RouterResponse {
        self.classify_intent_with_cancel(query, context, None).await
    }

    /// Route `query`. Never fails: every provider failure, timeout or
    /// cancellation degrades to a lower tier.
    pub async fn classify_intent_with_cancel(
        &self,
        query: &str,
        context: &RouterContext,
        cancel: Option<&CancellationToken>,
    ) -> RouterResponse {
        let span = router_span!(query.len());
        let started = Instant::now();

        let response = if query.trim().is_empty() {
            RouterResponse {
                classification: IntentClassification::safe_fallback(),
                features: RouterFeatures::empty(),
                processing_time_ms: 0,
                fallback_used: true,
                explanation: Some("empty query".to_string()),
            }
        } else {
            self.cascade(query, context, cancel).instrument(span).await
        };

        let response = RouterResponse {
            processing_time_ms: started.elapsed().as_millis() as u64,
            ..response
        };
        self.metrics.record(RequestOutcome {
            method: response.features.method,
            intent: response.classification.intent,
            confidence: response.classification.confidence,
            latency_ms: response.processing_time_ms,
            fallback_used: response.fallback_used,
            meta_invoked: response.features.meta_invoked,
        });
        events::intent_classified(
            response.classification.intent,
            response.classification.confidence,
            response.features.method,
            response.processing_time_ms,
        );
        response
    }

    async fn cascade(
        &self,
        query: &str,
        context: &RouterContext,
        cancel: Option<&CancellationToken>,
    ) -> RouterResponse {
        let embedded = self.store.engine().embed_with_cancel(query, cancel).await;
        let vector = embedded.vector;
        let usable = !embedded.degraded && !is_zero(&vector);
        let neighbors = self.config.embedding_neighbors;

        // A zero vector carries no signal; z-scoring it would still let the
        // classifier produce a confident answer.
        let (distribution, prediction): (IntentDistribution, LinearPrediction) = rayon::join(
            || self.store.distribution_for_vector(&vector, neighbors),
            || {
                if usable {
                    self.classifier.classify_embedding(&vector)
                } else {
                    LinearPrediction::uniform()
                }
            },
        );

        let mut features = RouterFeatures {
            method: RoutingMethod::MetaClassifier,
            classifier_intent: prediction.intent,
            classifier_confidence: prediction.confidence,
            classifier_probabilities: prediction.probabilities.clone(),
            embedding_intent: distribution.top_intent(),
            embedding_confidence: distribution.confidence(),
            neighbors_considered: distribution.total,
            meta_invoked: false,
            classifier_trained: prediction.trained,
        };

        if prediction.trained && prediction.confidence >= self.config.classifier_threshold {
            features.method = RoutingMethod::Classifier;
            return self.respond(
                query,
                context,
                prediction.intent,
                prediction.confidence,
                features,
                false,
                None,
            );
        }

        if let Some(intent) = features.embedding_intent {
            if features.embedding_confidence >= self.config.embedding_threshold {
                features.method = RoutingMethod::Embedding;
                let confidence = features.embedding_confidence;
                return self.respond(query, context, intent, confidence, features, false, None);
            }
        }

        events::tier_fallback(
            "embedding",
            "meta_classifier",
            if !usable {
                "query embedding unavailable"
            } else {
                "tiers below threshold"
            },
        );
        let meta = self
            .meta_tier(query, &vector, context, &features, cancel)
            .await;
        features.meta_invoked = meta.meta_invoked;
        self.respond(
            query,
            context,
            meta.intent,
            meta.confidence,
            features,
            meta.fallback_used,
            Some(meta.explanation),
        )
    }

    async fn meta_tier(
        &self,
        query: &str,
        vector: &[f32],
        context: &RouterContext,
        features: &RouterFeatures,
        cancel: Option<&CancellationToken>,
    ) -> MetaDecision {
        let gated_in = self
            .few_shot
            .should_use_meta_classifier(features.classifier_confidence, features.embedding_confidence);

        let try_few_shot = match self.policy {
            FallbackPolicy::Heuristic => false,
            FallbackPolicy::FewShot => true,
            FallbackPolicy::FewShotThenHeuristic => gated_in,
        };

        if try_few_shot {
            let outcome = self
                .few_shot
                .classify_embedded(query, vector, context, None, cancel)
                .await;
            if !outcome.fallback || self.policy == FallbackPolicy::FewShot {
                return MetaDecision {
                    intent: outcome.classification.intent,
                    confidence: outcome.classification.confidence,
                    fallback_used: outcome.fallback,
                    meta_invoked: true,
                    explanation: if outcome.fallback {
                        format!("few-shot fallback: {}", outcome.reasoning)
                    } else {
                        format!("few-shot: {}", outcome.reasoning)
                    },
                };
            }
            events::tier_fallback("few_shot", "heuristic", &outcome.reasoning);
            let intent = heuristic_intent(query, context);
            return MetaDecision {
                intent,
                confidence: HEURISTIC_CONFIDENCE,
                fallback_used: true,
                meta_invoked: true,
                explanation: format!("keyword heuristic after few-shot failure: {}", outcome.reasoning),
            };
        }

        MetaDecision {
            intent: heuristic_intent(query, context),
            confidence: HEURISTIC_CONFIDENCE,
            fallback_used: true,
            meta_invoked: false,
            explanation: "keyword heuristic".to_string(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn respond(
        &self,
        query: &str,
        context: &RouterContext,
        intent: Intent,
        confidence: f64,
        features: RouterFeatures,
        fallback_used: bool,
        explanation: Option<String>,
    ) -> RouterResponse {
        let slots = synthesize(intent, query, context);
        RouterResponse {
            classification: IntentClassification::new(intent, confidence, slots),
            features,
            processing_time_ms: 0,
            fallback_used,
            explanation,
        }
    }

    /// Store a corrected example when the prediction was wrong. Returns the
    /// new example id. The classifier is not retrained here.
    pub async fn add_feedback(
        &self,
        query: &str,
        correct: Intent,
        predicted: Intent,
        confidence: f64,
    ) -> Option<String> {
        let stored = if correct != predicted && !query.trim().is_empty() {
            Some(self.store.add_example(query, correct, confidence).await)
        } else {
            None
        };
        self.metrics.record_feedback(stored.is_some());
        events::feedback_recorded(correct, predicted, stored.is_some());
        stored
    }

    /// Train the linear classifier on every example currently stored.
    /// Gradient descent runs on the blocking pool, off the async workers.
    pub async fn retrain(&self) -> Result<TrainingMetrics, ClassifierError> {
        let examples = self.store.examples();
        let span = waypoint_observability::training_span!(examples.len());
        let classifier = Arc::clone(&self.classifier);
        let metrics = tokio::task::spawn_blocking(move || {
            let _entered = span.entered();
            classifier.train(&examples)
        })
        .await
        .map_err(|e| ClassifierError::TrainingAborted {
            reason: e.to_string(),
        })??;
        events::classifier_retrained(metrics.examples, metrics.accuracy, metrics.converged);
        Ok(metrics)
    }

    pub fn metrics(&self) -> RouterMetrics {
        self.metrics.snapshot()
    }

    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }
}
