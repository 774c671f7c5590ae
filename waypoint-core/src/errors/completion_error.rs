/// Generative completion errors.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("provider unavailable: {provider}: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    #[error("empty completion from {provider}")]
    EmptyCompletion { provider: String },
}
