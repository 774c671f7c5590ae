//! Two-tier embedding cache coordinator.
//!
//! L1 (moka in-memory) → L2 (SQLite persistent, optional).
//! Write-through: a computed embedding goes to both tiers. L2 hits are
//! promoted to L1.

pub mod l1_memory;
pub mod l2_sqlite;

pub use l1_memory::L1MemoryCache;
pub use l2_sqlite::L2SqliteCache;

use std::time::Duration;

use tracing::debug;
use waypoint_core::config::EmbeddingConfig;
use waypoint_core::errors::EmbeddingError;

/// Which tier served a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheHitTier {
    L1,
    L2,
    Miss,
}

pub struct CacheCoordinator {
    pub l1: L1MemoryCache,
    pub l2: Option<L2SqliteCache>,
}

impl CacheCoordinator {
    /// Build from config. Opens the L2 database when a path is configured.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let l2 = match &config.l2_cache_path {
            Some(path) => Some(L2SqliteCache::open(std::path::Path::new(path))?),
            None => None,
        };
        Ok(Self {
            l1: L1MemoryCache::new(
                config.l1_cache_size,
                Duration::from_secs(config.l1_ttl_secs),
                Duration::from_secs(config.l1_tti_secs),
            ),
            l2,
        })
    }

    /// L1-only coordinator.
    pub fn memory_only(l1_capacity: u64) -> Self {
        Self {
            l1: L1MemoryCache::new(
                l1_capacity,
                Duration::from_secs(86_400),
                Duration::from_secs(3_600),
            ),
            l2: None,
        }
    }

    pub fn with_l2(mut self, l2: L2SqliteCache) -> Self {
        self.l2 = Some(l2);
        self
    }

    /// Look up an embedding by key across tiers.
    pub fn get(&self, key: &str) -> (Option<Vec<f32>>, CacheHitTier) {
        if let Some(vec) = self.l1.get(key) {
            debug!(key, tier = "L1", "cache hit");
            return (Some(vec), CacheHitTier::L1);
        }

        if let Some(vec) = self.l2.as_ref().and_then(|l2| l2.get(key)) {
            debug!(key, tier = "L2", "cache hit");
            self.l1.insert(key.to_string(), vec.clone());
            return (Some(vec), CacheHitTier::L2);
        }

        (None, CacheHitTier::Miss)
    }

    /// Store an embedding in every tier.
    pub fn put(&self, key: &str, embedding: &[f32]) {
        self.l1.insert(key.to_string(), embedding.to_vec());
        if let Some(l2) = &self.l2 {
            l2.insert(key, embedding);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_on_empty() {
        let coord = CacheCoordinator::memory_only(100);
        let (result, tier) = coord.get("nonexistent");
        assert!(result.is_none());
        assert_eq!(tier, CacheHitTier::Miss);
    }

    #[test]
    fn l2_hit_promotes_to_l1() {
        let l2 = L2SqliteCache::in_memory().unwrap();
        l2.insert("hash2", &[3.0, 4.0]);
        let coord = CacheCoordinator::memory_only(100).with_l2(l2);

        let (result, tier) = coord.get("hash2");
        assert_eq!(result, Some(vec![3.0, 4.0]));
        assert_eq!(tier, CacheHitTier::L2);

        let (_, tier2) = coord.get("hash2");
        assert_eq!(tier2, CacheHitTier::L1);
    }

    #[test]
    fn put_writes_through() {
        let coord = CacheCoordinator::memory_only(100).with_l2(L2SqliteCache::in_memory().unwrap());
        coord.put("hash4", &[7.0, 8.0]);
        assert_eq!(coord.l1.get("hash4"), Some(vec![7.0, 8.0]));
        assert_eq!(coord.l2.as_ref().unwrap().get("hash4"), Some(vec![7.0, 8.0]));
    }
}
