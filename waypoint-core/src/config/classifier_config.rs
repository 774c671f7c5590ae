use serde::{Deserialize, Serialize};

use super::defaults;

/// Linear classifier training configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Upper bound on gradient descent iterations per intent.
    pub max_iterations: usize,
    pub learning_rate: f64,
    /// L2 regularisation strength.
    pub l2_lambda: f64,
    /// Early stop once mean absolute residual drops below this.
    pub convergence_threshold: f64,
    /// Train from the labeled examples when the runtime starts.
    pub train_on_startup: bool,
    /// Optional JSON file the weights are loaded from and saved to.
    pub weights_path: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_iterations: defaults::DEFAULT_MAX_ITERATIONS,
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            l2_lambda: defaults::DEFAULT_L2_LAMBDA,
            convergence_threshold: defaults::DEFAULT_CONVERGENCE_THRESHOLD,
            train_on_startup: defaults::DEFAULT_TRAIN_ON_STARTUP,
            weights_path: None,
        }
    }
}
