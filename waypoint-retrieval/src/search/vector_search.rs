//! Bounded vector store query, materialised into `RagChunk`s.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};
use waypoint_core::cancellation::{bounded, CancellationToken};
use waypoint_core::models::RagChunk;
use waypoint_core::traits::{IChunkLookup, IVectorStore, VectorFilter, VectorMatch};
use waypoint_tokens::TokenCounter;

/// One vector query plus the chunk lookup needed to fill in text the store
/// does not keep.
pub struct VectorSearch<'a> {
    pub store: &'a dyn IVectorStore,
    pub lookup: &'a dyn IChunkLookup,
    pub counter: &'a TokenCounter,
    pub timeout: Duration,
}

impl VectorSearch<'_> {
    /// Up to `top_k` chunks ranked by score descending. Any store failure,
    /// timeout, or cancellation yields an empty list.
    pub async fn run(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: &VectorFilter,
        cancel: Option<&CancellationToken>,
    ) -> Vec<RagChunk> {
        if top_k == 0 {
            return Vec::new();
        }

        let matches = match bounded(self.store.query(vector, top_k, filter), self.timeout, cancel).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                warn!(store = self.store.name(), error = %e, "vector query failed");
                return Vec::new();
            }
            Err(interrupted) => {
                warn!(store = self.store.name(), %interrupted, "vector query interrupted");
                return Vec::new();
            }
        };

        let mut chunks = self.materialize(matches, cancel).await;
        chunks.sort_by(|a, b| b.score.total_cmp(&a.score));
        chunks.truncate(top_k);
        chunks
    }

    async fn materialize(
        &self,
        matches: Vec<VectorMatch>,
        cancel: Option<&CancellationToken>,
    ) -> Vec<RagChunk> {
        let missing: Vec<String> = matches
            .iter()
            .filter(|m| m.metadata.text.is_none())
            .map(|m| m.id.clone())
            .collect();

        let mut looked_up: HashMap<String, RagChunk> = HashMap::new();
        if !missing.is_empty() {
            match bounded(self.lookup.get_chunks(&missing), self.timeout, cancel).await {
                Ok(Ok(found)) => {
                    looked_up.extend(found.into_iter().map(|c| (c.id.clone(), c)));
                }
                Ok(Err(e)) => warn!(error = %e, ids = missing.len(), "chunk lookup failed"),
                Err(interrupted) => warn!(%interrupted, ids = missing.len(), "chunk lookup interrupted"),
            }
        }

        matches
            .into_iter()
            .filter_map(|m| self.to_chunk(m, &mut looked_up))
            .collect()
    }

    fn to_chunk(&self, m: VectorMatch, looked_up: &mut HashMap<String, RagChunk>) -> Option<RagChunk> {
        let score = clamp_unit(m.score);
        let meta = m.metadata;
        let mut chunk = match meta.text {
            Some(text) => RagChunk {
                id: m.id,
                doc_id: meta.doc_id,
                anchor: meta.anchor,
                text,
                score,
                headings: meta.headings,
                updated_at: meta.updated_at,
                tokens: meta.tokens.unwrap_or(0),
            },
            None => {
                let Some(mut found) = looked_up.remove(&m.id) else {
                    debug!(id = %m.id, "dropping hit without resolvable text");
                    return None;
                };
                found.score = score;
                if found.doc_id.is_empty() {
                    found.doc_id = meta.doc_id;
                }
                if let Some(tokens) = meta.tokens {
                    found.tokens = tokens;
                }
                found
            }
        };
        if chunk.tokens == 0 && !chunk.text.is_empty() {
            chunk.tokens = self.counter.count_cached(&chunk.text);
        }
        Some(chunk)
    }
}

pub(crate) fn clamp_unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}
