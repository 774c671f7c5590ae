//! WaypointRuntime owns every engine and wires the request path:
//! route, assemble evidence, build the instruction, verify it.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use waypoint_classifier::{ApiCompletionProvider, FewShotClassifier, LinearClassifier, TrainingMetrics};
use waypoint_core::cancellation::CancellationToken;
use waypoint_core::config::WaypointConfig;
use waypoint_core::errors::{ClassifierError, WaypointResult};
use waypoint_core::intent::Intent;
use waypoint_core::models::{
    DegradationEvent, HealthReport, Instruction, InstructionInputs, RagChunk, ResponseValidation,
    RouterContext, RouterResponse, VerificationResult, WebResult,
};
use waypoint_core::traits::{
    IChunkLookup, ICompletionProvider, IEmbeddingProvider, IVectorStore, IWebSearchProvider,
};
use waypoint_embeddings::{seed_examples, EmbeddingEngine, EmbeddingStore};
use waypoint_observability::degradation::DegradationAlert;
use waypoint_observability::tracing_setup::init_tracing;
use waypoint_observability::{
    HealthSnapshot, ObservabilityEngine, QueryLogEntry, RouterMetrics, RouterMetricsCollector,
};
use waypoint_retrieval::{InMemoryChunkIndex, InstructionBuilder, RetrievalAdapter};
use waypoint_router::IntentRouter;
use waypoint_validation::{validate_response, InstructionVerifier};

/// Options for constructing the runtime. Collaborators left as `None` are
/// built from the configuration.
#[derive(Default)]
pub struct RuntimeOptions {
    /// TOML configuration string. If None, uses defaults.
    pub config_toml: Option<String>,
    /// Replaces the configured embedding provider.
    pub embedding_provider: Option<Box<dyn IEmbeddingProvider>>,
    /// Replaces the configured completion endpoint.
    pub completion_provider: Option<Arc<dyn ICompletionProvider>>,
    /// Vector store and chunk lookup. Both default to one in-memory index.
    pub vector_store: Option<Arc<dyn IVectorStore>>,
    pub chunk_lookup: Option<Arc<dyn IChunkLookup>>,
    pub web_search: Option<Arc<dyn IWebSearchProvider>>,
    /// Install the global tracing subscriber from `observability` config.
    pub init_tracing: bool,
}

/// Result of `build_and_verify_instruction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionOutcome {
    pub instruction: Instruction,
    pub verification: VerificationResult,
    /// Chunks the instruction may cite.
    pub chunks: Vec<RagChunk>,
    pub web_results: Vec<WebResult>,
}

/// The central runtime owning all Waypoint engines.
///
/// Engines that require `&mut self` are wrapped in `Mutex`; everything
/// else is shared, so one runtime serves concurrent requests.
pub struct WaypointRuntime {
    pub config: WaypointConfig,
    pub embeddings: Arc<EmbeddingEngine>,
    pub router: IntentRouter,
    pub retrieval: RetrievalAdapter,
    pub builder: InstructionBuilder,
    pub verifier: InstructionVerifier,
    pub observability: Mutex<ObservabilityEngine>,
    index: Option<Arc<InMemoryChunkIndex>>,
    completion: Option<Arc<dyn ICompletionProvider>>,
}

impl WaypointRuntime {
    /// Build every engine, seed the example store, and load or train the
    /// classifier. Only configuration problems fail construction.
    pub async fn new(opts: RuntimeOptions) -> WaypointResult<Self> {
        let config = match &opts.config_toml {
            Some(toml_str) => WaypointConfig::from_toml(toml_str)?,
            None => WaypointConfig::default(),
        };
        if opts.init_tracing {
            init_tracing(&config.observability);
        }

        // Embeddings
        let embeddings = Arc::new(match opts.embedding_provider {
            Some(provider) => EmbeddingEngine::with_provider(
                provider,
                Duration::from_millis(config.embedding.timeout_ms),
            ),
            None => EmbeddingEngine::from_config(&config.embedding, &config.providers)?,
        });

        // Labeled examples
        let store = Arc::new(EmbeddingStore::new(embeddings.clone()));
        if config.embedding.load_seed_examples {
            let seeded = store.seed(seed_examples()).await;
            info!(seeded, "labeled examples loaded");
        }

        // Classifiers
        let classifier = Arc::new(LinearClassifier::new(
            config.classifier.clone(),
            embeddings.clone(),
        ));
        let completion = match opts.completion_provider {
            Some(provider) => Some(provider),
            None => match &config.providers.completion {
                Some(endpoint) => {
                    let api_key = endpoint.resolve_api_key("completion")?;
                    let provider: Arc<dyn ICompletionProvider> = Arc::new(
                        ApiCompletionProvider::new(endpoint, api_key, config.few_shot.timeout_ms),
                    );
                    Some(provider)
                }
                None => None,
            },
        };
        let few_shot =
            FewShotClassifier::new(store.clone(), completion.clone(), config.few_shot.clone());

        // Router
        let router = IntentRouter::new(
            config.router.clone(),
            store,
            classifier,
            few_shot,
            Arc::new(RouterMetricsCollector::new()),
        );

        // Retrieval
        let (store, lookup, index) = match (opts.vector_store, opts.chunk_lookup) {
            (Some(store), Some(lookup)) => (store, lookup, None),
            (store, lookup) => {
                let index = Arc::new(InMemoryChunkIndex::new());
                let store = store.unwrap_or_else(|| index.clone() as Arc<dyn IVectorStore>);
                let lookup = lookup.unwrap_or_else(|| index.clone() as Arc<dyn IChunkLookup>);
                (store, lookup, Some(index))
            }
        };
        let mut retrieval =
            RetrievalAdapter::new(config.retrieval.clone(), embeddings.clone(), store, lookup);
        if let Some(web) = opts.web_search {
            retrieval = retrieval.with_web_search(web);
        }

        let runtime = Self {
            builder: InstructionBuilder::new(config.retrieval.answer_max_tokens),
            verifier: InstructionVerifier::new(config.verifier.clone()),
            observability: Mutex::new(ObservabilityEngine::new(&config.observability)),
            embeddings,
            router,
            retrieval,
            index,
            completion,
            config,
        };
        runtime.prepare_classifier().await;
        Ok(runtime)
    }

    /// Load persisted weights when present, otherwise train on startup if
    /// configured. Failures leave the classifier untrained.
    async fn prepare_classifier(&self) {
        let classifier = self.router.classifier();
        if let Some(path) = self.config.classifier.weights_path.as_deref() {
            if Path::new(path).exists() {
                match classifier.load_weights(Path::new(path)) {
                    Ok(()) => return,
                    Err(e) => warn!(error = %e, path, "ignoring persisted classifier weights"),
                }
            }
        }
        if self.config.classifier.train_on_startup && !self.router.store().is_empty() {
            if let Err(e) = self.retrain().await {
                warn!(error = %e, "startup training failed, classifier stays untrained");
            }
        }
    }

    pub async fn classify_intent(&self, query: &str, context: &RouterContext) -> RouterResponse {
        self.classify_intent_with_cancel(query, context, None).await
    }

    /// Route `query` and record it in the query log. Never fails.
    pub async fn classify_intent_with_cancel(
        &self,
        query: &str,
        context: &RouterContext,
        cancel: Option<&CancellationToken>,
    ) -> RouterResponse {
        let response = self
            .router
            .classify_intent_with_cancel(query, context, cancel)
            .await;

        let mut obs = self.observability();
        obs.log_query(QueryLogEntry::routed(
            query,
            response.classification.intent,
            response.features.method,
            response.classification.confidence,
            Duration::from_millis(response.processing_time_ms),
            response.fallback_used,
        ));
        obs.record_degradations(self.embeddings.drain_degradation_events());
        if response.features.meta_invoked {
            if response.fallback_used {
                let failure = response.explanation.clone().unwrap_or_default();
                obs.record_degradation(DegradationEvent::now("few_shot", failure, "heuristic"));
            } else {
                obs.mark_recovered("few_shot");
            }
        }
        drop(obs);
        response
    }

    /// Components degrading often or for long.
    pub fn degradation_alerts(&self) -> Vec<DegradationAlert> {
        self.observability().degradation_alerts()
    }

    /// Assemble evidence for a routed request, build the instruction, and
    /// verify it against the chunks retrieved for this same request.
    pub async fn build_and_verify_instruction(
        &self,
        response: &RouterResponse,
        query: &str,
        selection: Option<&str>,
        scope: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> InstructionOutcome {
        let evidence = self.retrieval.assemble(response, query, scope, cancel).await;
        let inputs = InstructionInputs {
            query: query.to_string(),
            selection: selection.map(str::to_string),
            scope: scope.map(str::to_string),
        };
        let instruction = self.builder.build(response, inputs, &evidence);
        let verification = self.verifier.verify(&instruction, &evidence.chunks);

        let mut obs = self.observability();
        let retrieval = &mut obs.metrics.retrieval;
        retrieval.record_request(
            response.classification.intent,
            evidence.chunks.len(),
            evidence.tokens_used as u64,
            evidence.budget_tokens as u64,
            evidence.coverage,
        );
        retrieval.record_expansion(evidence.expanded);
        if evidence.truncated.is_some() {
            retrieval.record_truncation();
        }
        retrieval.record_verification(verification.is_valid);
        obs.record_degradations(self.embeddings.drain_degradation_events());
        drop(obs);

        InstructionOutcome {
            instruction,
            verification,
            chunks: evidence.chunks,
            web_results: evidence.web_results,
        }
    }

    /// Check the citation markers of a generated answer.
    pub fn validate_response(&self, answer: &str, instruction: &Instruction) -> ResponseValidation {
        validate_response(answer, instruction)
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
        self.router
            .add_feedback(query, correct, predicted, confidence)
            .await
    }

    /// Train the classifier on every stored example and persist the weights
    /// when a path is configured.
    pub async fn retrain(&self) -> Result<TrainingMetrics, ClassifierError> {
        let metrics = self.router.retrain().await?;
        if let Some(path) = self.config.classifier.weights_path.as_deref() {
            self.router.classifier().save_weights(Path::new(path))?;
        }
        Ok(metrics)
    }

    pub fn get_metrics(&self) -> RouterMetrics {
        self.router.metrics()
    }

    /// Router, retrieval, and embedding metrics plus query log state as JSON.
    pub fn metrics_snapshot(&self) -> WaypointResult<serde_json::Value> {
        let stats = self.embeddings.stats();
        let mut obs = self.observability();
        obs.metrics
            .embedding
            .set_cache_totals(stats.l1_hits, stats.l2_hits, stats.misses, stats.failures);
        obs.metrics.embedding.set_active_provider(self.embeddings.active_provider());
        let mut snapshot = obs.metrics_snapshot()?;
        snapshot["router"] = serde_json::to_value(self.get_metrics())?;
        Ok(snapshot)
    }

    /// Zero router and retrieval counters. The query log and degradation
    /// history are kept.
    pub fn reset_metrics(&self) {
        self.router.reset_metrics();
        self.observability().reset_metrics();
    }

    pub fn health(&self) -> HealthReport {
        let router = self.get_metrics();
        let stats = self.embeddings.stats();
        let mut obs = self.observability();
        obs.record_degradations(self.embeddings.drain_degradation_events());
        obs.health_report(HealthSnapshot {
            labeled_examples: self.router.store().len(),
            classifier_trained: self.router.classifier().is_trained(),
            total_requests: router.total_requests,
            fallback_count: router.fallback_count,
            embedding_lookups: stats.l1_hits + stats.l2_hits + stats.misses,
            embedding_failures: stats.failures,
            embedding_cache_hit_rate: stats.hit_rate(),
            completion_configured: self.completion.is_some(),
            completion_available: self.completion.as_ref().is_some_and(|c| c.is_available()),
            ..Default::default()
        })
    }

    /// Index a document into the built-in chunk index. Returns the number
    /// of searchable chunks added; 0 when an external store is injected.
    pub async fn index_document(&self, doc_id: &str, scope: Option<&str>, text: &str) -> usize {
        match &self.index {
            Some(index) => {
                index
                    .index_document(&self.embeddings, doc_id, scope, text, None)
                    .await
            }
            None => {
                warn!(doc_id, "no built-in index; documents belong in the injected store");
                0
            }
        }
    }

    fn observability(&self) -> std::sync::MutexGuard<'_, ObservabilityEngine> {
        self.observability
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
