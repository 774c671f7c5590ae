/// Waypoint version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Confidence at or above which the linear classifier wins the cascade.
pub const CLASSIFIER_WIN_THRESHOLD: f64 = 0.8;

/// Neighbour-vote confidence at or above which the embedding tier wins.
pub const EMBEDDING_WIN_THRESHOLD: f64 = 0.7;

/// Neighbours consulted for the embedding vote.
pub const EMBEDDING_VOTE_NEIGHBORS: usize = 10;

/// Fixed confidence reported by the keyword heuristic.
pub const HEURISTIC_CONFIDENCE: f64 = 0.4;

/// Safe classification returned when every tier failed.
pub const SAFE_FALLBACK_CONFIDENCE: f64 = 0.3;

/// Maximum labeled examples placed into a few-shot prompt.
pub const MAX_FEW_SHOT_EXAMPLES: usize = 5;

/// Upper bound accepted for `policies.max_tokens`.
pub const MAX_INSTRUCTION_TOKENS: usize = 32_000;

/// Marker appended when a chunk is hard-cut during packing.
pub const TRUNCATION_MARKER: &str = "…";
