//! Cache hit rates (L1/L2) and the provider currently answering.

use serde::{Deserialize, Serialize};

/// Embedding subsystem metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingMetrics {
    pub l1_hits: u64,
    pub l2_hits: u64,
    pub total_lookups: u64,
    /// Lookups that ended in a zero vector.
    pub failures: u64,
    /// Provider at the head of the degradation chain.
    pub active_provider: String,
}

impl EmbeddingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cache counters with the engine's cumulative totals.
    pub fn set_cache_totals(&mut self, l1_hits: u64, l2_hits: u64, misses: u64, failures: u64) {
        self.l1_hits = l1_hits;
        self.l2_hits = l2_hits;
        self.total_lookups = l1_hits + l2_hits + misses;
        self.failures = failures;
    }

    pub fn set_active_provider(&mut self, provider: &str) {
        provider.clone_into(&mut self.active_provider);
    }

    /// Combined cache hit rate across both tiers.
    pub fn combined_hit_rate(&self) -> f64 {
        if self.total_lookups == 0 {
            return 0.0;
        }
        (self.l1_hits + self.l2_hits) as f64 / self.total_lookups as f64
    }
}
