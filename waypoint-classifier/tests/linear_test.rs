//! Training, inference and persistence of the linear classifier.

use std::sync::Arc;

use chrono::Utc;
use waypoint_classifier::LinearClassifier;
use waypoint_core::config::ClassifierConfig;
use waypoint_core::errors::ClassifierError;
use waypoint_core::intent::Intent;
use waypoint_core::models::{ExampleSource, LabeledExample};
use waypoint_embeddings::{seed_examples, EmbeddingEngine, EmbeddingStore};

const DIMS: usize = 8;

fn example(intent: Intent, embedding: Vec<f32>) -> LabeledExample {
    LabeledExample {
        id: id_for(&embedding),
        query: format!("{intent} example"),
        intent,
        confidence: 1.0,
        embedding,
        source: ExampleSource::Seed,
        created_at: Utc::now(),
    }
}

fn id_for(v: &[f32]) -> String {
    v.iter().map(|x| format!("{x:.2}")).collect::<Vec<_>>().join(",")
}

/// Two clusters: `ask` near axis 0, `web_search` near axis 1, with small
/// deterministic jitter on the other axes.
fn separable_set() -> Vec<LabeledExample> {
    let mut out = Vec::new();
    for i in 0..20 {
        let jitter = (i as f32 * 0.37).sin() * 0.1;
        let mut a = vec![jitter; DIMS];
        a[0] = 1.0 + jitter;
        out.push(example(Intent::Ask, a));

        let mut w = vec![-jitter; DIMS];
        w[1] = 1.0 - jitter;
        out.push(example(Intent::WebSearch, w));
    }
    out
}

fn classifier(dims: usize) -> LinearClassifier {
    LinearClassifier::new(
        ClassifierConfig::default(),
        Arc::new(EmbeddingEngine::hashed(dims)),
    )
}

#[test]
fn untrained_is_uniform_and_stable() {
    let c = classifier(DIMS);
    let v = vec![0.5; DIMS];
    let first = c.classify_embedding(&v);
    let second = c.classify_embedding(&v);
    assert_eq!(first, second);
    assert!(!first.trained);
    assert_eq!(first.intent, Intent::Ask);
    assert!((first.confidence - 1.0 / 6.0).abs() < 1e-12);
    assert_eq!(first.probabilities.len(), Intent::COUNT);
}

#[test]
fn separable_intents_reach_high_accuracy() {
    let c = classifier(DIMS);
    let metrics = c.train(&separable_set()).unwrap();
    assert!(metrics.accuracy >= 0.9, "accuracy {}", metrics.accuracy);
    assert_eq!(metrics.examples, 40);
    assert_eq!(metrics.per_intent[&Intent::Ask].support, 20);
    assert_eq!(metrics.per_intent[&Intent::Other].support, 0);

    let mut ask = vec![0.0; DIMS];
    ask[0] = 1.0;
    let p = c.classify_embedding(&ask);
    assert!(p.trained);
    assert_eq!(p.intent, Intent::Ask);

    let mut web = vec![0.0; DIMS];
    web[1] = 1.0;
    assert_eq!(c.classify_embedding(&web).intent, Intent::WebSearch);
}

#[test]
fn probabilities_sum_to_one() {
    let c = classifier(DIMS);
    c.train(&separable_set()).unwrap();
    let p = c.classify_embedding(&[0.3, -0.2, 0.1, 0.0, 0.4, -0.1, 0.2, 0.0]);
    let sum: f64 = p.probabilities.values().sum();
    assert!((sum - 1.0).abs() < 1e-9);
    assert!(p.confidence <= 1.0 && p.confidence >= 0.0);
}

#[test]
fn wrong_dimension_falls_back_to_uniform() {
    let c = classifier(DIMS);
    c.train(&separable_set()).unwrap();
    let p = c.classify_embedding(&[1.0, 0.0, 0.0]);
    assert!(!p.trained);
    assert_eq!(p.intent, Intent::Ask);
}

#[test]
fn empty_or_zero_training_set_is_rejected() {
    let c = classifier(DIMS);
    assert!(matches!(c.train(&[]), Err(ClassifierError::EmptyTrainingSet)));
    let zeros = vec![example(Intent::Ask, vec![0.0; DIMS])];
    assert!(matches!(c.train(&zeros), Err(ClassifierError::EmptyTrainingSet)));
    assert!(!c.is_trained());
}

#[test]
fn weights_round_trip_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.json");

    let trained = classifier(DIMS);
    trained.train(&separable_set()).unwrap();
    trained.save_weights(&path).unwrap();

    let restored = classifier(DIMS);
    restored.load_weights(&path).unwrap();
    let v = [0.9, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    assert_eq!(trained.classify_embedding(&v), restored.classify_embedding(&v));
}

#[test]
fn loading_weights_of_another_dimension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.json");
    let trained = classifier(DIMS);
    trained.train(&separable_set()).unwrap();
    trained.save_weights(&path).unwrap();

    let other = classifier(16);
    let err = other.load_weights(&path).unwrap_err();
    assert!(matches!(
        err,
        ClassifierError::InconsistentDimensions { expected: 16, actual: 8 }
    ));
    assert!(!other.is_trained());
}

#[test]
fn save_without_training_fails() {
    let dir = tempfile::tempdir().unwrap();
    let c = classifier(DIMS);
    assert!(c.save_weights(&dir.path().join("w.json")).is_err());
}

#[test]
fn inference_during_training_sees_whole_snapshots() {
    let c = classifier(DIMS);
    let data = separable_set();
    let probe = vec![0.2; DIMS];
    std::thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..3 {
                c.train(&data).unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..200 {
                let p = c.classify_embedding(&probe);
                let sum: f64 = p.probabilities.values().sum();
                assert!((sum - 1.0).abs() < 1e-9);
            }
        });
    });
    assert!(c.is_trained());
}

#[tokio::test]
async fn trains_from_seeded_store() {
    let engine = Arc::new(EmbeddingEngine::hashed(256));
    let store = EmbeddingStore::new(engine.clone());
    let seeded = store.seed(seed_examples()).await;

    let c = LinearClassifier::new(ClassifierConfig::default(), engine);
    let metrics = c.train(&store.examples()).unwrap();
    assert_eq!(metrics.examples, seeded);
    assert!(metrics.accuracy > 0.5, "accuracy {}", metrics.accuracy);

    let p = c.classify("What is machine learning?").await;
    assert!(p.trained);
}
