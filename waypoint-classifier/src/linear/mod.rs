//! One-vs-all logistic regression over query embeddings.
//!
//! Weights live in an immutable [`ClassifierWeights`] snapshot behind a
//! `RwLock<Option<Arc<_>>>`. Training builds a fresh snapshot off-lock and
//! swaps it in; inference clones the `Arc` under a read lock.

mod metrics;
mod train;
mod weights;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use waypoint_core::config::ClassifierConfig;
use waypoint_core::errors::ClassifierError;
use waypoint_core::intent::Intent;
use waypoint_core::models::LabeledExample;
use waypoint_embeddings::EmbeddingEngine;

pub use metrics::{evaluate, IntentMetrics, TrainingMetrics};
pub use train::{feature_stats, fit_binary, BinaryFit, STD_FLOOR};
pub use weights::{ClassifierWeights, IntentWeights};

/// Output of one inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPrediction {
    pub intent: Intent,
    pub confidence: f64,
    pub probabilities: BTreeMap<Intent, f64>,
    /// False when the uniform distribution was returned.
    pub trained: bool,
}

impl LinearPrediction {
    /// Uniform distribution; `ask` wins by `Intent::ALL` order.
    pub fn uniform() -> Self {
        let p = 1.0 / Intent::COUNT as f64;
        Self {
            intent: Intent::Ask,
            confidence: p,
            probabilities: Intent::ALL.iter().map(|i| (*i, p)).collect(),
            trained: false,
        }
    }

    fn from_probabilities(probabilities: BTreeMap<Intent, f64>) -> Self {
        let mut best = (Intent::Ask, f64::NEG_INFINITY);
        for intent in Intent::ALL {
            let p = probabilities.get(&intent).copied().unwrap_or(0.0);
            if p > best.1 {
                best = (intent, p);
            }
        }
        Self {
            intent: best.0,
            confidence: best.1.clamp(0.0, 1.0),
            probabilities,
            trained: true,
        }
    }
}

pub struct LinearClassifier {
    config: ClassifierConfig,
    engine: Arc<EmbeddingEngine>,
    weights: RwLock<Option<Arc<ClassifierWeights>>>,
    /// Serialises training runs. Inference never takes it.
    training: Mutex<()>,
}

impl LinearClassifier {
    pub fn new(config: ClassifierConfig, engine: Arc<EmbeddingEngine>) -> Self {
        Self {
            config,
            engine,
            weights: RwLock::new(None),
            training: Mutex::new(()),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Current weights, if any.
    pub fn snapshot(&self) -> Option<Arc<ClassifierWeights>> {
        self.weights
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fit one sub-classifier per intent and swap the result in.
    /// Examples with a zero embedding or a stray dimension are skipped.
    pub fn train(&self, examples: &[LabeledExample]) -> Result<TrainingMetrics, ClassifierError> {
        let _guard = self.training.lock().unwrap_or_else(PoisonError::into_inner);
        let started = Instant::now();

        let dims = examples
            .iter()
            .find(|e| e.embedding.iter().any(|x| *x != 0.0))
            .map(|e| e.embedding.len())
            .ok_or(ClassifierError::EmptyTrainingSet)?;

        let usable: Vec<&LabeledExample> = examples
            .iter()
            .filter(|e| e.embedding.len() == dims && e.embedding.iter().any(|x| *x != 0.0))
            .collect();
        let skipped = examples.len() - usable.len();
        if skipped > 0 {
            warn!(skipped, dims, "training examples skipped for unusable embeddings");
        }

        let raw: Vec<Vec<f32>> = usable.iter().map(|e| e.embedding.clone()).collect();
        let (mean, std) = feature_stats(&raw, dims);
        let x: Vec<Vec<f64>> = raw
            .iter()
            .map(|row| {
                row.iter()
                    .zip(mean.iter().zip(&std))
                    .map(|(v, (m, s))| (*v as f64 - m) / s)
                    .collect()
            })
            .collect();

        let fits: Vec<(Intent, BinaryFit)> = Intent::ALL
            .as_slice()
            .par_iter()
            .map(|&intent| {
                let targets: Vec<f64> = usable
                    .iter()
                    .map(|e| if e.intent == intent { 1.0 } else { 0.0 })
                    .collect();
                (intent, fit_binary(&x, &targets, &self.config))
            })
            .collect();

        let iterations = fits.iter().map(|(_, f)| f.iterations).max().unwrap_or(0);
        let converged = fits.iter().all(|(_, f)| f.converged);
        let snapshot = ClassifierWeights {
            per_intent: fits
                .into_iter()
                .map(|(intent, fit)| IntentWeights {
                    intent,
                    weights: fit.weights,
                    bias: fit.bias,
                })
                .collect(),
            mean,
            std,
            dimensions: dims,
            trained_at: Utc::now(),
            examples_seen: usable.len(),
        };

        let pairs: Vec<(Intent, Intent)> = usable
            .iter()
            .map(|e| {
                let predicted = snapshot
                    .probabilities(&e.embedding)
                    .map(|p| LinearPrediction::from_probabilities(p).intent)
                    .unwrap_or(Intent::Ask);
                (e.intent, predicted)
            })
            .collect();
        let (accuracy, per_intent) = evaluate(&pairs);

        *self.weights.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(snapshot));

        info!(
            examples = usable.len(),
            dims,
            iterations,
            converged,
            accuracy,
            duration_ms = started.elapsed().as_millis() as u64,
            "linear classifier trained"
        );

        Ok(TrainingMetrics {
            accuracy,
            per_intent,
            iterations,
            converged,
            examples: usable.len(),
        })
    }

    /// Embed `query` and classify it.
    pub async fn classify(&self, query: &str) -> LinearPrediction {
        let vector = self.engine.embed(query).await;
        self.classify_embedding(&vector)
    }

    /// Classify a precomputed embedding. Untrained, dimension mismatch or a
    /// degenerate score vector all yield the uniform distribution.
    pub fn classify_embedding(&self, vector: &[f32]) -> LinearPrediction {
        let Some(weights) = self.snapshot() else {
            return LinearPrediction::uniform();
        };
        match weights.probabilities(vector) {
            Some(p) => LinearPrediction::from_probabilities(p),
            None => {
                warn!(
                    expected = weights.dimensions,
                    actual = vector.len(),
                    "classifier input unusable, returning uniform distribution"
                );
                LinearPrediction::uniform()
            }
        }
    }

    pub fn save_weights(&self, path: &Path) -> Result<(), ClassifierError> {
        let weights = self.snapshot().ok_or(ClassifierError::EmptyTrainingSet)?;
        weights.save(path)?;
        debug!(path = %path.display(), "classifier weights saved");
        Ok(())
    }

    /// Load weights from JSON. Rejected when their dimension differs from
    /// the embedding engine's.
    pub fn load_weights(&self, path: &Path) -> Result<(), ClassifierError> {
        let weights = ClassifierWeights::load(path)?;
        let expected = self.engine.dimensions();
        if weights.dimensions != expected {
            return Err(ClassifierError::InconsistentDimensions {
                expected,
                actual: weights.dimensions,
            });
        }
        *self.weights.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(weights));
        info!(path = %path.display(), "classifier weights loaded");
        Ok(())
    }
}
