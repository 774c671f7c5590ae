use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding provider: "api" or "hashed".
    pub provider: String,
    /// Vector dimensions, fixed for the process lifetime.
    pub dimensions: usize,
    /// Per-call timeout for the provider.
    pub timeout_ms: u64,
    /// L1 in-memory cache max entries.
    pub l1_cache_size: u64,
    /// L1 time-to-live in seconds.
    pub l1_ttl_secs: u64,
    /// L1 time-to-idle in seconds.
    pub l1_tti_secs: u64,
    /// Path of the L2 SQLite cache. `None` disables L2.
    pub l2_cache_path: Option<String>,
    /// Load the built-in labeled examples at startup.
    pub load_seed_examples: bool,
    /// Fall back to the hashed provider when the API provider fails.
    /// Hashed vectors do not share a space with API vectors.
    pub local_fallback: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            timeout_ms: defaults::DEFAULT_EMBEDDING_TIMEOUT_MS,
            l1_cache_size: defaults::DEFAULT_L1_CACHE_SIZE,
            l1_ttl_secs: defaults::DEFAULT_L1_TTL_SECS,
            l1_tti_secs: defaults::DEFAULT_L1_TTI_SECS,
            l2_cache_path: None,
            load_seed_examples: defaults::DEFAULT_LOAD_SEED_EXAMPLES,
            local_fallback: defaults::DEFAULT_LOCAL_FALLBACK,
        }
    }
}
