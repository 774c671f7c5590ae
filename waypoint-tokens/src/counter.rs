use std::sync::Arc;

use moka::sync::Cache;
use tiktoken_rs::CoreBPE;
use tracing::warn;

/// Characters per token assumed when the tokenizer cannot be loaded.
const CHARS_PER_TOKEN: usize = 4;

/// Token counter wrapping tiktoken's cl100k_base tokenizer.
/// Caches results per blake3 content hash.
pub struct TokenCounter {
    bpe: Option<Arc<CoreBPE>>,
    cache: Cache<String, usize>,
}

impl TokenCounter {
    /// Create a counter with the given cache capacity. Falls back to a
    /// character-length estimate if the tokenizer fails to load.
    pub fn new(cache_capacity: u64) -> Self {
        let bpe = match tiktoken_rs::cl100k_base() {
            Ok(bpe) => Some(Arc::new(bpe)),
            Err(e) => {
                warn!(error = %e, "cl100k_base unavailable, using character estimate");
                None
            }
        };
        Self {
            bpe,
            cache: Cache::new(cache_capacity),
        }
    }

    /// Count tokens in the given text (uncached).
    pub fn count(&self, text: &str) -> usize {
        match &self.bpe {
            Some(bpe) => bpe.encode_ordinary(text).len(),
            None => text.chars().count().div_ceil(CHARS_PER_TOKEN),
        }
    }

    /// Count tokens with blake3 content-hash caching.
    pub fn count_cached(&self, text: &str) -> usize {
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        self.cache.get_with(hash, || self.count(text))
    }

    /// Whether the exact tokenizer is loaded.
    pub fn is_exact(&self) -> bool {
        self.bpe.is_some()
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new(10_000)
    }
}
