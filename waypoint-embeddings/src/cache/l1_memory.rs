//! L1 in-memory cache using moka.
//!
//! TinyLFU admission, per-entry time-to-live and time-to-idle.

use std::time::Duration;

use moka::sync::Cache;

/// L1 in-memory embedding cache keyed by normalised-text hash.
pub struct L1MemoryCache {
    cache: Cache<String, Vec<f32>>,
}

impl L1MemoryCache {
    pub fn new(max_entries: u64, ttl: Duration, tti: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(tti)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, embedding: Vec<f32>) {
        self.cache.insert(key, embedding);
    }

    /// Approximate entry count; moka applies writes lazily.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> L1MemoryCache {
        L1MemoryCache::new(100, Duration::from_secs(60), Duration::from_secs(60))
    }

    #[test]
    fn insert_and_get() {
        let cache = cache();
        cache.insert("abc".to_string(), vec![1.0, 2.0, 3.0]);
        assert_eq!(cache.get("abc"), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn clear_empties_cache() {
        let cache = cache();
        cache.insert("a".to_string(), vec![1.0]);
        cache.clear();
        assert_eq!(cache.get("a"), None);
    }
}
