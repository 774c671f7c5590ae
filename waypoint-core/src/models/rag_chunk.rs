use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A retrieved passage. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RagChunk {
    pub id: String,
    pub doc_id: String,
    /// Position-stable locator inside the document (e.g. `#sec-3.p2`).
    pub anchor: String,
    pub text: String,
    /// Retrieval relevance in [0, 1]. Not a probability.
    pub score: f64,
    pub headings: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Estimated token cost.
    pub tokens: usize,
}

/// A web search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WebResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub score: f64,
}
