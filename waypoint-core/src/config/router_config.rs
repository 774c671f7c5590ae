use serde::{Deserialize, Serialize};

use super::defaults;

/// What the cascade does when neither the classifier nor the embedding vote
/// clears its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Keyword heuristic only. Never calls a provider.
    Heuristic,
    /// Few-shot completion only; its safe default is returned on failure.
    FewShot,
    /// Few-shot completion when gated in, keyword heuristic when it fails
    /// or is gated out.
    FewShotThenHeuristic,
}

/// Router orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub classifier_threshold: f64,
    pub embedding_threshold: f64,
    /// Neighbours consulted for the embedding vote.
    pub embedding_neighbors: usize,
    /// `None` picks `FewShotThenHeuristic` when a completion provider is
    /// configured and `Heuristic` otherwise.
    pub fallback_policy: Option<FallbackPolicy>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            classifier_threshold: defaults::DEFAULT_CLASSIFIER_THRESHOLD,
            embedding_threshold: defaults::DEFAULT_EMBEDDING_THRESHOLD,
            embedding_neighbors: defaults::DEFAULT_EMBEDDING_NEIGHBORS,
            fallback_policy: None,
        }
    }
}

impl RouterConfig {
    /// Resolve the effective fallback policy.
    pub fn effective_policy(&self, has_completion_provider: bool) -> FallbackPolicy {
        match (self.fallback_policy, has_completion_provider) {
            (Some(FallbackPolicy::Heuristic), _) | (_, false) => FallbackPolicy::Heuristic,
            (Some(policy), true) => policy,
            (None, true) => FallbackPolicy::FewShotThenHeuristic,
        }
    }
}
