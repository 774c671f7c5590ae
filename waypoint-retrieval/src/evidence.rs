use serde::{Deserialize, Serialize};
use waypoint_core::models::{RagChunk, TaskKind, WebResult};

/// Evidence assembled for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub task: TaskKind,
    /// Packed chunks in score order.
    pub chunks: Vec<RagChunk>,
    pub web_results: Vec<WebResult>,
    /// Chunks considered by the packer, after expansion.
    pub candidates: usize,
    /// Chunks added by hierarchy expansion.
    pub expanded: usize,
    pub tokens_used: usize,
    pub budget_tokens: usize,
    pub truncated: Option<String>,
    pub confidence: f64,
    pub coverage: f64,
}

impl Evidence {
    /// No evidence for `task`.
    pub fn none(task: TaskKind, budget_tokens: usize) -> Self {
        Self {
            task,
            chunks: Vec::new(),
            web_results: Vec::new(),
            candidates: 0,
            expanded: 0,
            tokens_used: 0,
            budget_tokens,
            truncated: None,
            confidence: 0.0,
            coverage: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty() && self.web_results.is_empty()
    }
}
