//! Batch gradient descent for one-vs-all logistic regression.

use waypoint_core::config::ClassifierConfig;

use super::weights::{dot, sigmoid};

/// Standard deviations below this are treated as 1.0.
pub const STD_FLOOR: f64 = 1e-6;

/// Per-feature mean and floored standard deviation.
pub fn feature_stats(features: &[Vec<f32>], dims: usize) -> (Vec<f64>, Vec<f64>) {
    let n = features.len().max(1) as f64;
    let mut mean = vec![0.0; dims];
    for row in features {
        for (m, x) in mean.iter_mut().zip(row) {
            *m += *x as f64;
        }
    }
    for m in &mut mean {
        *m /= n;
    }

    let mut var = vec![0.0; dims];
    for row in features {
        for ((v, x), m) in var.iter_mut().zip(row).zip(&mean) {
            let d = *x as f64 - m;
            *v += d * d;
        }
    }
    let std = var
        .into_iter()
        .map(|v| {
            let s = (v / n).sqrt();
            if s < STD_FLOOR {
                1.0
            } else {
                s
            }
        })
        .collect();
    (mean, std)
}

/// Outcome of fitting one binary sub-classifier.
#[derive(Debug, Clone)]
pub struct BinaryFit {
    pub weights: Vec<f64>,
    pub bias: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Fit `sigmoid(w·x + b)` to `targets` (1.0 positive, 0.0 negative).
/// Stops early once the mean absolute residual drops below the configured
/// threshold.
pub fn fit_binary(x: &[Vec<f64>], targets: &[f64], params: &ClassifierConfig) -> BinaryFit {
    let dims = x.first().map_or(0, Vec::len);
    let n = x.len().max(1) as f64;
    let mut weights = vec![0.0; dims];
    let mut bias = 0.0;
    let mut residuals = vec![0.0; x.len()];

    for iteration in 0..params.max_iterations {
        let mut abs_sum = 0.0;
        for ((row, target), r) in x.iter().zip(targets).zip(residuals.iter_mut()) {
            *r = sigmoid(dot(&weights, row) + bias) - target;
            abs_sum += r.abs();
        }
        if abs_sum / n < params.convergence_threshold {
            return BinaryFit {
                weights,
                bias,
                iterations: iteration,
                converged: true,
            };
        }

        let mut grad = vec![0.0; dims];
        for (row, r) in x.iter().zip(&residuals) {
            for (g, xi) in grad.iter_mut().zip(row) {
                *g += r * xi;
            }
        }
        for (w, g) in weights.iter_mut().zip(&grad) {
            *w -= params.learning_rate * (g / n + params.l2_lambda * *w);
        }
        bias -= params.learning_rate * residuals.iter().sum::<f64>() / n;
    }

    BinaryFit {
        weights,
        bias,
        iterations: params.max_iterations,
        converged: false,
    }
}
