use serde::{Deserialize, Serialize};

use super::defaults;

/// Few-shot fallback classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FewShotConfig {
    /// Mean of the other tiers' confidence below which this tier runs.
    pub confidence_threshold: f64,
    pub max_examples: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

impl Default for FewShotConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: defaults::DEFAULT_META_CONFIDENCE_THRESHOLD,
            max_examples: defaults::DEFAULT_FEW_SHOT_EXAMPLES,
            temperature: defaults::DEFAULT_FEW_SHOT_TEMPERATURE,
            max_tokens: defaults::DEFAULT_FEW_SHOT_MAX_TOKENS,
            timeout_ms: defaults::DEFAULT_COMPLETION_TIMEOUT_MS,
        }
    }
}
