use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::intent::Intent;

/// Where a labeled example came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ExampleSource {
    Seed,
    Feedback,
}

/// A query with a known intent. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LabeledExample {
    pub id: String,
    pub query: String,
    pub intent: Intent,
    /// Label confidence in [0, 1].
    pub confidence: f64,
    pub embedding: Vec<f32>,
    pub source: ExampleSource,
    pub created_at: DateTime<Utc>,
}
