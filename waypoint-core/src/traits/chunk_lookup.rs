use async_trait::async_trait;

use crate::errors::RetrievalError;
use crate::models::RagChunk;

/// Resolves chunk ids to full chunks and walks the document hierarchy.
/// Returned chunks carry a score of 0; the caller assigns scores.
#[async_trait]
pub trait IChunkLookup: Send + Sync {
    /// Chunks for the given ids. Unknown ids are skipped.
    async fn get_chunks(&self, ids: &[String]) -> Result<Vec<RagChunk>, RetrievalError>;

    /// Up to `radius` chunks on each side of `chunk_id` within its document.
    async fn siblings(&self, chunk_id: &str, radius: usize) -> Result<Vec<RagChunk>, RetrievalError>;

    /// The enclosing section chunk, if the document has one.
    async fn parent(&self, chunk_id: &str) -> Result<Option<RagChunk>, RetrievalError>;
}
