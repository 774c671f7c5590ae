//! Hierarchical expansion: pull in neighbouring paragraphs and enclosing
//! sections around each hit.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tracing::warn;
use waypoint_core::cancellation::{bounded, CancellationToken, Interrupted};
use waypoint_core::errors::RetrievalError;
use waypoint_core::models::RagChunk;
use waypoint_core::traits::IChunkLookup;
use waypoint_tokens::TokenCounter;

/// Expands a hit set through the chunk lookup.
pub struct HierarchyExpander<'a> {
    pub lookup: &'a dyn IChunkLookup,
    pub counter: &'a TokenCounter,
    pub timeout: Duration,
    pub sibling_decay: f64,
    pub parent_decay: f64,
}

#[derive(Debug)]
enum ExpandFailure {
    Lookup(RetrievalError),
    Interrupted(Interrupted),
}

impl fmt::Display for ExpandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lookup(e) => write!(f, "{e}"),
            Self::Interrupted(i) => write!(f, "chunk lookup {i}"),
        }
    }
}

impl HierarchyExpander<'_> {
    /// Union of `chunks`, their siblings within `neighbors` positions, and
    /// their parents, deduplicated by id keeping the highest score.
    ///
    /// Best effort: any lookup failure returns `chunks` unchanged.
    pub async fn expand(
        &self,
        chunks: &[RagChunk],
        neighbors: usize,
        include_parents: bool,
        cancel: Option<&CancellationToken>,
    ) -> Vec<RagChunk> {
        if chunks.is_empty() || (neighbors == 0 && !include_parents) {
            return chunks.to_vec();
        }

        match self.try_expand(chunks, neighbors, include_parents, cancel).await {
            Ok(expanded) => expanded,
            Err(failure) => {
                warn!(%failure, hits = chunks.len(), "hierarchy expansion failed, keeping hits");
                chunks.to_vec()
            }
        }
    }

    async fn try_expand(
        &self,
        chunks: &[RagChunk],
        neighbors: usize,
        include_parents: bool,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<RagChunk>, ExpandFailure> {
        let mut merged = Merged::default();
        for chunk in chunks {
            merged.insert(chunk.clone());
        }

        for hit in chunks {
            if neighbors > 0 {
                let siblings = self.call(self.lookup.siblings(&hit.id, neighbors), cancel).await?;
                for sibling in siblings {
                    merged.insert(self.derive(sibling, hit.score * self.sibling_decay));
                }
            }
            if include_parents {
                if let Some(parent) = self.call(self.lookup.parent(&hit.id), cancel).await? {
                    merged.insert(self.derive(parent, hit.score * self.parent_decay));
                }
            }
        }

        Ok(merged.into_vec())
    }

    async fn call<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, RetrievalError>>,
        cancel: Option<&CancellationToken>,
    ) -> Result<T, ExpandFailure> {
        bounded(fut, self.timeout, cancel)
            .await
            .map_err(ExpandFailure::Interrupted)?
            .map_err(ExpandFailure::Lookup)
    }

    fn derive(&self, mut chunk: RagChunk, score: f64) -> RagChunk {
        chunk.score = score.clamp(0.0, 1.0);
        if chunk.tokens == 0 && !chunk.text.is_empty() {
            chunk.tokens = self.counter.count_cached(&chunk.text);
        }
        chunk
    }
}

/// Insertion-ordered set of chunks keyed by id.
#[derive(Default)]
struct Merged {
    order: Vec<RagChunk>,
    index: HashMap<String, usize>,
}

impl Merged {
    fn insert(&mut self, chunk: RagChunk) {
        match self.index.get(&chunk.id) {
            Some(&pos) => {
                let existing = &mut self.order[pos];
                if chunk.score > existing.score {
                    existing.score = chunk.score;
                }
            }
            None => {
                self.index.insert(chunk.id.clone(), self.order.len());
                self.order.push(chunk);
            }
        }
    }

    fn into_vec(self) -> Vec<RagChunk> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, score: f64) -> RagChunk {
        RagChunk {
            id: id.to_string(),
            doc_id: "d".to_string(),
            anchor: String::new(),
            text: id.to_string(),
            score,
            headings: vec![],
            updated_at: None,
            tokens: 1,
        }
    }

    #[test]
    fn merge_keeps_highest_score_and_first_position() {
        let mut merged = Merged::default();
        merged.insert(chunk("a", 0.4));
        merged.insert(chunk("b", 0.5));
        merged.insert(chunk("a", 0.9));
        merged.insert(chunk("b", 0.1));
        let out = merged.into_vec();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "a");
        assert_eq!(out[0].score, 0.9);
        assert_eq!(out[1].score, 0.5);
    }
}
