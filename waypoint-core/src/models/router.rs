use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::intent::{Intent, IntentClassification};

/// Caller-supplied flags. Never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct RouterContext {
    pub has_attached_docs: bool,
    pub doc_ids: Vec<String>,
    pub has_selection: bool,
    pub selection_length: usize,
    pub recent_tools: Vec<String>,
    pub conversation_length: usize,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

/// Which tier decided the intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMethod {
    Classifier,
    Embedding,
    MetaClassifier,
}

impl RoutingMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classifier => "classifier",
            Self::Embedding => "embedding",
            Self::MetaClassifier => "meta_classifier",
        }
    }
}

/// Signals observed by the cascade for one request.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RouterFeatures {
    pub method: RoutingMethod,
    pub classifier_intent: Intent,
    pub classifier_confidence: f64,
    pub classifier_probabilities: BTreeMap<Intent, f64>,
    /// `None` when the store returned no neighbours.
    pub embedding_intent: Option<Intent>,
    pub embedding_confidence: f64,
    pub neighbors_considered: usize,
    /// Whether the few-shot completion tier was invoked.
    pub meta_invoked: bool,
    pub classifier_trained: bool,
}

impl RouterFeatures {
    /// Features for a request that never reached the tiers.
    pub fn empty() -> Self {
        let uniform = 1.0 / Intent::COUNT as f64;
        Self {
            method: RoutingMethod::MetaClassifier,
            classifier_intent: Intent::Ask,
            classifier_confidence: uniform,
            classifier_probabilities: Intent::ALL.iter().map(|i| (*i, uniform)).collect(),
            embedding_intent: None,
            embedding_confidence: 0.0,
            neighbors_considered: 0,
            meta_invoked: false,
            classifier_trained: false,
        }
    }
}

/// Result of `classify_intent`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RouterResponse {
    pub classification: IntentClassification,
    pub features: RouterFeatures,
    pub processing_time_ms: u64,
    pub fallback_used: bool,
    pub explanation: Option<String>,
}
