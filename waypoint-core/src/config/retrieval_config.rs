use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Candidates requested from the vector store.
    pub top_k: usize,
    /// Siblings fetched on each side of a hit.
    pub neighbors: usize,
    pub include_parents: bool,
    /// Token budget for the packed context.
    pub budget_tokens: usize,
    /// Timeout for each vector store or chunk lookup call.
    pub timeout_ms: u64,
    /// Score multiplier for expanded siblings.
    pub sibling_decay: f64,
    /// Score multiplier for expanded parents.
    pub parent_decay: f64,
    /// Web results requested for `web_search` intents.
    pub web_top_k: usize,
    /// `policies.max_tokens` written into built instructions.
    pub answer_max_tokens: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: defaults::DEFAULT_RETRIEVAL_TOP_K,
            neighbors: defaults::DEFAULT_EXPAND_NEIGHBORS,
            include_parents: defaults::DEFAULT_INCLUDE_PARENTS,
            budget_tokens: defaults::DEFAULT_TOKEN_BUDGET,
            timeout_ms: defaults::DEFAULT_RETRIEVAL_TIMEOUT_MS,
            sibling_decay: defaults::DEFAULT_SIBLING_DECAY,
            parent_decay: defaults::DEFAULT_PARENT_DECAY,
            web_top_k: defaults::DEFAULT_WEB_TOP_K,
            answer_max_tokens: defaults::DEFAULT_ANSWER_MAX_TOKENS,
        }
    }
}
