use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use waypoint_core::intent::Intent;

/// Precision, recall and F1 of one intent on the training set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Summary of one training run, evaluated on the training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub accuracy: f64,
    pub per_intent: BTreeMap<Intent, IntentMetrics>,
    /// Largest iteration count across the per-intent fits.
    pub iterations: usize,
    /// True when every per-intent fit stopped early.
    pub converged: bool,
    pub examples: usize,
}

/// Score `(actual, predicted)` pairs.
pub fn evaluate(pairs: &[(Intent, Intent)]) -> (f64, BTreeMap<Intent, IntentMetrics>) {
    let total = pairs.len();
    let correct = pairs.iter().filter(|(a, p)| a == p).count();
    let accuracy = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };

    let per_intent = Intent::ALL
        .iter()
        .map(|&intent| {
            let tp = pairs.iter().filter(|(a, p)| *a == intent && *p == intent).count();
            let predicted = pairs.iter().filter(|(_, p)| *p == intent).count();
            let support = pairs.iter().filter(|(a, _)| *a == intent).count();
            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            (
                intent,
                IntentMetrics {
                    precision,
                    recall,
                    f1,
                    support,
                },
            )
        })
        .collect();

    (accuracy, per_intent)
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
