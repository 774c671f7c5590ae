use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waypoint_core::errors::ClassifierError;
use waypoint_core::intent::Intent;

/// Weight vector and bias of one one-vs-all sub-classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentWeights {
    pub intent: Intent,
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// Immutable snapshot of a trained classifier. Replaced wholesale after
/// every training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierWeights {
    /// One entry per intent, in `Intent::ALL` order.
    pub per_intent: Vec<IntentWeights>,
    /// Training-set feature means.
    pub mean: Vec<f64>,
    /// Training-set feature standard deviations, already floored.
    pub std: Vec<f64>,
    pub dimensions: usize,
    pub trained_at: DateTime<Utc>,
    pub examples_seen: usize,
}

impl ClassifierWeights {
    /// z-score a raw embedding with the training statistics.
    pub fn normalize(&self, features: &[f32]) -> Vec<f64> {
        features
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(x, (mean, std))| (*x as f64 - mean) / std)
            .collect()
    }

    /// Renormalised per-intent sigmoid scores, or `None` when the vector
    /// does not match the trained dimension.
    pub fn probabilities(&self, features: &[f32]) -> Option<BTreeMap<Intent, f64>> {
        if features.len() != self.dimensions {
            return None;
        }
        let x = self.normalize(features);
        let raw: Vec<(Intent, f64)> = self
            .per_intent
            .iter()
            .map(|w| (w.intent, sigmoid(dot(&w.weights, &x) + w.bias)))
            .collect();
        let sum: f64 = raw.iter().map(|(_, p)| p).sum();
        if sum <= f64::EPSILON || !sum.is_finite() {
            return None;
        }
        Some(raw.into_iter().map(|(i, p)| (i, p / sum)).collect())
    }

    pub fn save(&self, path: &Path) -> Result<(), ClassifierError> {
        let json = serde_json::to_string(self).map_err(|e| persist_err(path, e))?;
        std::fs::write(path, json).map_err(|e| persist_err(path, e))
    }

    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let raw = std::fs::read_to_string(path).map_err(|e| persist_err(path, e))?;
        let weights: Self = serde_json::from_str(&raw).map_err(|e| persist_err(path, e))?;
        weights.check_shape()?;
        Ok(weights)
    }

    /// Every vector must agree with `dimensions` and every intent must
    /// have a sub-classifier.
    fn check_shape(&self) -> Result<(), ClassifierError> {
        let expected = self.dimensions;
        for len in [self.mean.len(), self.std.len()]
            .into_iter()
            .chain(self.per_intent.iter().map(|w| w.weights.len()))
        {
            if len != expected {
                return Err(ClassifierError::InconsistentDimensions {
                    expected,
                    actual: len,
                });
            }
        }
        if self.per_intent.len() != Intent::COUNT {
            return Err(ClassifierError::PersistFailed {
                path: String::new(),
                reason: format!("expected {} intents, found {}", Intent::COUNT, self.per_intent.len()),
            });
        }
        Ok(())
    }
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn persist_err(path: &Path, e: impl std::fmt::Display) -> ClassifierError {
    ClassifierError::PersistFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
