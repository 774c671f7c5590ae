/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("vector store query failed: {reason}")]
    SearchFailed { reason: String },

    #[error("chunk lookup failed: {reason}")]
    LookupFailed { reason: String },

    #[error("web search failed: {reason}")]
    WebSearchFailed { reason: String },
}
