//! End-to-end cascade behaviour over the seeded example store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use waypoint_classifier::{FewShotClassifier, LinearClassifier};
use waypoint_core::cancellation::CancellationToken;
use waypoint_core::config::{ClassifierConfig, FallbackPolicy, FewShotConfig, RouterConfig};
use waypoint_core::errors::{CompletionError, EmbeddingError};
use waypoint_core::intent::Intent;
use waypoint_core::models::{RouterContext, RoutingMethod};
use waypoint_core::traits::{ChatMessage, CompletionOptions, ICompletionProvider, IEmbeddingProvider};
use waypoint_embeddings::{seed_examples, EmbeddingEngine, EmbeddingStore};
use waypoint_observability::RouterMetricsCollector;
use waypoint_router::IntentRouter;

struct Scripted {
    reply: Result<String, ()>,
    calls: AtomicUsize,
}

impl Scripted {
    fn ok(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ICompletionProvider for Scripted {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(|_| CompletionError::ProviderUnavailable {
            provider: "scripted".into(),
            reason: "503".into(),
        })
    }
    fn name(&self) -> &str {
        "scripted"
    }
    fn is_available(&self) -> bool {
        true
    }
}

struct DownEmbeddings;

#[async_trait]
impl IEmbeddingProvider for DownEmbeddings {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::ProviderUnavailable {
            provider: "down".into(),
        })
    }
    fn dimensions(&self) -> usize {
        64
    }
    fn name(&self) -> &str {
        "down"
    }
    fn is_available(&self) -> bool {
        true
    }
}

struct Setup {
    engine: Arc<EmbeddingEngine>,
    seed: bool,
    train: bool,
    provider: Option<Arc<dyn ICompletionProvider>>,
    policy: Option<FallbackPolicy>,
}

impl Setup {
    fn new() -> Self {
        Self {
            engine: Arc::new(EmbeddingEngine::hashed(1024)),
            seed: true,
            train: false,
            provider: None,
            policy: None,
        }
    }

    async fn build(self) -> IntentRouter {
        let store = Arc::new(EmbeddingStore::new(self.engine.clone()));
        if self.seed {
            store.seed(seed_examples()).await;
        }
        let classifier = Arc::new(LinearClassifier::new(ClassifierConfig::default(), self.engine));
        let few_shot = FewShotClassifier::new(store.clone(), self.provider, FewShotConfig::default());
        let config = RouterConfig {
            fallback_policy: self.policy,
            ..Default::default()
        };
        let router = IntentRouter::new(
            config,
            store,
            classifier,
            few_shot,
            Arc::new(RouterMetricsCollector::new()),
        );
        if self.train {
            router.retrain().await.unwrap();
        }
        router
    }
}

fn ctx() -> RouterContext {
    RouterContext::default()
}

#[tokio::test]
async fn general_question_routes_to_ask_without_fallback() {
    let router = Setup::new().build().await;
    let r = router.classify_intent("What is machine learning?", &ctx()).await;
    assert_eq!(r.classification.intent, Intent::Ask);
    assert!(r.classification.confidence >= 0.7);
    assert_ne!(r.features.method, RoutingMethod::MetaClassifier);
    assert!(!r.fallback_used);
}

#[tokio::test]
async fn general_question_with_trained_classifier() {
    let router = Setup { train: true, ..Setup::new() }.build().await;
    let r = router.classify_intent("What is machine learning?", &ctx()).await;
    assert!(r.features.classifier_trained);
    assert_eq!(r.classification.intent, Intent::Ask);
    assert!(r.classification.confidence >= 0.7);
    assert_ne!(r.features.method, RoutingMethod::MetaClassifier);
}

#[tokio::test]
async fn recency_question_routes_to_web_search() {
    let router = Setup::new().build().await;
    let r = router
        .classify_intent("What's the latest news about Tesla?", &ctx())
        .await;
    assert_eq!(r.classification.intent, Intent::WebSearch);
    assert!(r.classification.slots.needs_recency);
}

#[tokio::test]
async fn single_lexical_match_does_not_win_embedding_tier() {
    let router = Setup::new().build().await;
    for query in ["Spanish", "photosynthesis"] {
        let r = router.classify_intent(query, &ctx()).await;
        assert_eq!(r.features.neighbors_considered, 10, "{query}");
        assert!(r.features.embedding_confidence < 0.7, "{query}: {:?}", r.features);
        assert_ne!(r.features.method, RoutingMethod::Embedding, "{query}");
        assert!(r.fallback_used, "{query}");
    }
}

#[tokio::test]
async fn empty_query_is_safe_fallback() {
    let router = Setup::new().build().await;
    let r = router.classify_intent("   ", &ctx()).await;
    assert_eq!(r.classification.intent, Intent::Ask);
    assert_eq!(r.classification.confidence, 0.3);
    assert!(r.fallback_used);
    assert_eq!(router.metrics().total_requests, 1);
    assert_eq!(router.metrics().fallback_count, 1);
}

#[tokio::test]
async fn embedding_outage_still_answers() {
    let engine = Arc::new(EmbeddingEngine::with_provider(
        Box::new(DownEmbeddings),
        Duration::from_millis(100),
    ));
    let router = Setup { engine, ..Setup::new() }.build().await;
    for query in ["What's the latest news about Tesla?", "hello", "rewrite my intro"] {
        let r = router.classify_intent(query, &ctx()).await;
        assert!(r.fallback_used, "{query}");
        assert_eq!(r.features.method, RoutingMethod::MetaClassifier);
        assert!((0.0..=1.0).contains(&r.classification.confidence));
    }
    let r = router
        .classify_intent("What's the latest news about Tesla?", &ctx())
        .await;
    assert_eq!(r.classification.intent, Intent::WebSearch);
    assert_eq!(r.classification.confidence, 0.4);
}

#[tokio::test]
async fn few_shot_answers_when_tiers_are_unsure() {
    let provider = Scripted::ok(r#"{"intent":"rag_query","confidence":0.75,"reasoning":"refers to a file"}"#);
    let router = Setup {
        seed: false,
        provider: Some(provider.clone() as Arc<dyn ICompletionProvider>),
        ..Setup::new()
    }
    .build()
    .await;
    assert_eq!(router.policy(), FallbackPolicy::FewShotThenHeuristic);

    let r = router.classify_intent("zxqv blorp", &ctx()).await;
    assert_eq!(r.classification.intent, Intent::RagQuery);
    assert_eq!(r.classification.confidence, 0.75);
    assert_eq!(r.features.method, RoutingMethod::MetaClassifier);
    assert!(r.features.meta_invoked);
    assert!(!r.fallback_used);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_few_shot_drops_to_heuristic() {
    let router = Setup {
        seed: false,
        provider: Some(Scripted::failing() as Arc<dyn ICompletionProvider>),
        ..Setup::new()
    }
    .build()
    .await;
    let r = router.classify_intent("fix the typos", &ctx()).await;
    assert_eq!(r.classification.intent, Intent::EditRequest);
    assert_eq!(r.classification.confidence, 0.4);
    assert!(r.fallback_used);
    assert!(r.features.meta_invoked);
}

#[tokio::test]
async fn few_shot_only_policy_returns_safe_default() {
    let router = Setup {
        seed: false,
        provider: Some(Scripted::failing() as Arc<dyn ICompletionProvider>),
        policy: Some(FallbackPolicy::FewShot),
        ..Setup::new()
    }
    .build()
    .await;
    let r = router.classify_intent("fix the typos", &ctx()).await;
    assert_eq!(r.classification.intent, Intent::Ask);
    assert_eq!(r.classification.confidence, 0.3);
    assert!(r.fallback_used);
}

#[tokio::test]
async fn heuristic_policy_never_calls_provider() {
    let provider = Scripted::ok(r#"{"intent":"other","confidence":0.9}"#);
    let router = Setup {
        seed: false,
        provider: Some(provider.clone() as Arc<dyn ICompletionProvider>),
        policy: Some(FallbackPolicy::Heuristic),
        ..Setup::new()
    }
    .build()
    .await;
    let r = router.classify_intent("draft a cover letter", &ctx()).await;
    assert_eq!(r.classification.intent, Intent::EditorWrite);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    assert!(!r.features.meta_invoked);
}

#[tokio::test]
async fn cancelled_request_falls_back() {
    let provider = Scripted::ok(r#"{"intent":"other","confidence":0.9}"#);
    let router = Setup {
        provider: Some(provider.clone() as Arc<dyn ICompletionProvider>),
        ..Setup::new()
    }
    .build()
    .await;
    let token = CancellationToken::new();
    token.cancel();
    let r = router
        .classify_intent_with_cancel("an uncached query about budgets", &ctx(), Some(&token))
        .await;
    assert!(r.fallback_used);
    assert_eq!(r.features.method, RoutingMethod::MetaClassifier);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn attached_docs_fill_target_docs() {
    let router = Setup::new().build().await;
    let context = RouterContext {
        has_attached_docs: true,
        doc_ids: vec!["doc-1".into()],
        ..Default::default()
    };
    let r = router
        .classify_intent("What does my uploaded report say about revenue?", &context)
        .await;
    if r.classification.intent == Intent::RagQuery {
        assert_eq!(r.classification.slots.target_docs, vec!["doc-1"]);
    } else {
        assert!(r.classification.slots.target_docs.is_empty());
    }
}

#[tokio::test]
async fn feedback_only_stores_corrections() {
    let router = Setup::new().build().await;
    let before = router.store().len();

    let none = router
        .add_feedback("what is rust", Intent::Ask, Intent::Ask, 0.9)
        .await;
    assert!(none.is_none());
    assert_eq!(router.store().len(), before);

    let id = router
        .add_feedback("check the stock price of nvidia", Intent::WebSearch, Intent::Ask, 0.9)
        .await;
    assert!(id.is_some());
    assert_eq!(router.store().len(), before + 1);
    assert!(!router.classifier().is_trained());

    let m = router.metrics();
    assert_eq!(m.feedback_received, 2);
    assert_eq!(m.feedback_stored, 1);
}

#[tokio::test]
async fn retrain_enables_classifier_tier() {
    let router = Setup::new().build().await;
    assert!(!router.classifier().is_trained());
    let metrics = router.retrain().await.unwrap();
    assert_eq!(metrics.examples, router.store().len());
    let r = router.classify_intent("hello there", &ctx()).await;
    assert!(r.features.classifier_trained);
}

#[tokio::test(flavor = "current_thread")]
async fn retrain_runs_alongside_requests() {
    let router = Setup::new().build().await;
    let context = ctx();
    let (trained, routed) = tokio::join!(
        router.retrain(),
        router.classify_intent("What is machine learning?", &context),
    );
    assert_eq!(trained.unwrap().examples, router.store().len());
    assert_eq!(routed.classification.intent, Intent::Ask);
    assert!(router.classifier().is_trained());
}

#[tokio::test]
async fn metrics_accumulate_per_request() {
    let router = Setup::new().build().await;
    router.classify_intent("What is machine learning?", &ctx()).await;
    router.classify_intent("What's the latest news about Tesla?", &ctx()).await;
    router.classify_intent("", &ctx()).await;
    let m = router.metrics();
    assert_eq!(m.total_requests, 3);
    assert_eq!(
        m.classifier_hits + m.embedding_hits + m.meta_classifier_hits,
        3
    );
    assert_eq!(m.intent_histogram.values().sum::<u64>(), 3);
    assert!(m.mean_confidence > 0.0 && m.mean_confidence <= 1.0);
}
