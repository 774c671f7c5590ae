//! Span definitions per operation: routing, retrieval, verification,
//! embedding, training.

/// Create a routing span.
#[macro_export]
macro_rules! router_span {
    ($query_len:expr) => {
        tracing::info_span!("waypoint.router", query_len = $query_len)
    };
}

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieval_span {
    ($intent:expr, $top_k:expr) => {
        tracing::info_span!("waypoint.retrieval", intent = %$intent, top_k = $top_k)
    };
}

/// Create an instruction verification span.
#[macro_export]
macro_rules! verification_span {
    ($task:expr) => {
        tracing::info_span!("waypoint.verification", task = %$task)
    };
}

/// Create an embedding span.
#[macro_export]
macro_rules! embedding_span {
    ($provider:expr, $dimension:expr) => {
        tracing::info_span!("waypoint.embedding", provider = %$provider, dimension = $dimension)
    };
}

/// Create a classifier training span.
#[macro_export]
macro_rules! training_span {
    ($examples:expr) => {
        tracing::info_span!("waypoint.training", examples = $examples)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const ROUTER: &str = "waypoint.router";
    pub const RETRIEVAL: &str = "waypoint.retrieval";
    pub const VERIFICATION: &str = "waypoint.verification";
    pub const EMBEDDING: &str = "waypoint.embedding";
    pub const TRAINING: &str = "waypoint.training";
}
