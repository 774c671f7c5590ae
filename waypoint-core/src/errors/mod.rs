mod classifier_error;
mod completion_error;
mod config_error;
mod embedding_error;
mod retrieval_error;

pub use classifier_error::ClassifierError;
pub use completion_error::CompletionError;
pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use retrieval_error::RetrievalError;

/// Convenience alias used across the workspace.
pub type WaypointResult<T> = Result<T, WaypointError>;

/// Top-level error. Provider and parse failures are recovered at tier
/// boundaries; only configuration errors escape to the caller of
/// `WaypointRuntime::new`.
#[derive(Debug, thiserror::Error)]
pub enum WaypointError {
    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("completion error: {0}")]
    CompletionError(#[from] CompletionError),

    #[error("retrieval error: {0}")]
    RetrievalError(#[from] RetrievalError),

    #[error("classifier error: {0}")]
    ClassifierError(#[from] ClassifierError),

    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WaypointError {
    /// Whether this failure should be absorbed by a tier fallback rather than
    /// surfaced. Everything except configuration is recoverable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ConfigError(_))
    }
}
