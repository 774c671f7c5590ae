//! Labeled-example store with nearest-neighbour search.
//!
//! Search is a linear cosine scan over an in-memory list. Fine for a few
//! thousand examples; past that, swap in an ANN index behind the same
//! `search_by_vector` contract.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;
use waypoint_core::intent::Intent;
use waypoint_core::models::{ExampleSource, LabeledExample};

use crate::distribution::IntentDistribution;
use crate::engine::EmbeddingEngine;
use crate::seeds::SeedExample;
use crate::similarity::{cosine_similarity, is_zero};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleMetadata {
    pub query: String,
    pub intent: Intent,
    pub confidence: f64,
    pub source: ExampleSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarExample {
    pub id: String,
    pub similarity: f64,
    pub metadata: ExampleMetadata,
}

pub struct EmbeddingStore {
    engine: Arc<EmbeddingEngine>,
    examples: RwLock<Vec<LabeledExample>>,
}

impl EmbeddingStore {
    pub fn new(engine: Arc<EmbeddingEngine>) -> Self {
        Self {
            engine,
            examples: RwLock::new(Vec::new()),
        }
    }

    pub fn engine(&self) -> &Arc<EmbeddingEngine> {
        &self.engine
    }

    /// Cached embedding of `text`; zero vector on provider failure.
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        self.engine.embed(text).await
    }

    /// Embed and store a labeled example from feedback. Returns its id.
    pub async fn add_example(&self, query: &str, intent: Intent, confidence: f64) -> String {
        self.add_example_from(query, intent, confidence, ExampleSource::Feedback)
            .await
    }

    pub async fn add_example_from(
        &self,
        query: &str,
        intent: Intent,
        confidence: f64,
        source: ExampleSource,
    ) -> String {
        let embedding = self.engine.embed(query).await;
        if is_zero(&embedding) {
            warn!(intent = %intent, "storing example without a usable embedding");
        }
        let example = LabeledExample {
            id: Uuid::new_v4().to_string(),
            query: query.to_string(),
            intent,
            confidence: confidence.clamp(0.0, 1.0),
            embedding,
            source,
            created_at: Utc::now(),
        };
        let id = example.id.clone();
        self.examples
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(example);
        debug!(id = %id, intent = %intent, "labeled example stored");
        id
    }

    /// Bulk insert seed examples. Returns how many were stored.
    pub async fn seed(&self, seeds: &[SeedExample]) -> usize {
        for seed in seeds {
            self.add_example_from(seed.query, seed.intent, seed.confidence, ExampleSource::Seed)
                .await;
        }
        seeds.len()
    }

    /// Top-k examples by cosine similarity to `query`.
    pub async fn search_similar(
        &self,
        query: &str,
        top_k: usize,
        intent_filter: Option<Intent>,
    ) -> Vec<SimilarExample> {
        let vector = self.engine.embed(query).await;
        self.search_by_vector(&vector, top_k, intent_filter)
    }

    /// Ranked descending by similarity over every example with a usable
    /// embedding; ties keep insertion order. A zero query vector matches
    /// nothing.
    pub fn search_by_vector(
        &self,
        vector: &[f32],
        top_k: usize,
        intent_filter: Option<Intent>,
    ) -> Vec<SimilarExample> {
        if top_k == 0 || is_zero(vector) {
            return Vec::new();
        }
        let examples = self.examples.read().unwrap_or_else(PoisonError::into_inner);
        let mut scored: Vec<(f64, &LabeledExample)> = examples
            .iter()
            .filter(|e| intent_filter.map_or(true, |intent| e.intent == intent))
            .filter(|e| !is_zero(&e.embedding))
            .map(|e| (cosine_similarity(vector, &e.embedding), e))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(top_k)
            .map(|(similarity, e)| SimilarExample {
                id: e.id.clone(),
                similarity,
                metadata: ExampleMetadata {
                    query: e.query.clone(),
                    intent: e.intent,
                    confidence: e.confidence,
                    source: e.source,
                },
            })
            .collect()
    }

    pub async fn intent_distribution(&self, query: &str, top_k: usize) -> IntentDistribution {
        let vector = self.engine.embed(query).await;
        self.distribution_for_vector(&vector, top_k)
    }

    /// Vote over the top-k neighbours of `vector`. A neighbour with no
    /// positive similarity takes a slot but votes for nothing, so a single
    /// weak match cannot carry the whole distribution.
    pub fn distribution_for_vector(&self, vector: &[f32], top_k: usize) -> IntentDistribution {
        let mut distribution = IntentDistribution::default();
        for neighbour in self.search_by_vector(vector, top_k, None) {
            if neighbour.similarity > 0.0 {
                distribution.observe(
                    neighbour.metadata.intent,
                    neighbour.metadata.confidence,
                    neighbour.similarity,
                );
            } else {
                distribution.abstain();
            }
        }
        distribution
    }

    /// Snapshot of stored examples that carry a usable embedding.
    pub fn examples(&self) -> Vec<LabeledExample> {
        self.examples
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| !is_zero(&e.embedding))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.examples.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
