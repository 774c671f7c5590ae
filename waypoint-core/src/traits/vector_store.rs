use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::RetrievalError;

/// Restricts a vector query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorFilter {
    /// Opaque tenant/partition key.
    pub scope: Option<String>,
    /// Limit to these documents when non-empty.
    pub doc_ids: Vec<String>,
}

/// Metadata stored alongside a vector. `text` may be absent when the store
/// only keeps ids, in which case the chunk lookup supplies it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkMetadata {
    pub doc_id: String,
    pub anchor: String,
    pub text: Option<String>,
    pub headings: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub tokens: Option<usize>,
}

/// One vector store hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    pub score: f64,
    pub metadata: ChunkMetadata,
}

/// Approximate nearest-neighbour store over document chunks.
#[async_trait]
pub trait IVectorStore: Send + Sync {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: &VectorFilter,
    ) -> Result<Vec<VectorMatch>, RetrievalError>;

    fn name(&self) -> &str;
}
