use serde::{Deserialize, Serialize};

use super::defaults;

/// Instruction verifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    pub min_coverage: f64,
    /// Threshold used by tasks that tolerate thin evidence.
    pub relaxed_coverage: f64,
    pub require_coverage: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            min_coverage: defaults::DEFAULT_MIN_COVERAGE,
            relaxed_coverage: defaults::DEFAULT_RELAXED_COVERAGE,
            require_coverage: defaults::DEFAULT_REQUIRE_COVERAGE,
        }
    }
}
