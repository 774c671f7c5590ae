//! EmbeddingEngine: provider chain plus cache tiers.
//!
//! `embed` never fails. A provider error, timeout, cancellation, or
//! wrong-sized vector yields a zero vector of the configured dimension,
//! which scores 0 against everything. Zero vectors are never cached.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};
use waypoint_core::cancellation::{bounded, CancellationToken};
use waypoint_core::config::{EmbeddingConfig, ProvidersConfig};
use waypoint_core::errors::{EmbeddingError, WaypointResult};
use waypoint_core::models::DegradationEvent;
use waypoint_core::text;
use waypoint_core::traits::IEmbeddingProvider;

use crate::cache::{CacheCoordinator, CacheHitTier};
use crate::degradation::DegradationChain;
use crate::providers::{self, HashedEmbeddingProvider};
use crate::similarity::is_zero;

/// An embedding together with how it was obtained.
#[derive(Debug, Clone)]
pub struct Embedded {
    pub vector: Vec<f32>,
    pub tier: CacheHitTier,
    /// True when the vector is the zero fallback.
    pub degraded: bool,
}

/// Counters exposed for metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbeddingStats {
    pub l1_hits: u64,
    pub l2_hits: u64,
    pub misses: u64,
    pub failures: u64,
}

impl EmbeddingStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.l1_hits + self.l2_hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.l1_hits + self.l2_hits) as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct Counters {
    l1_hits: AtomicU64,
    l2_hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

pub struct EmbeddingEngine {
    chain: DegradationChain,
    cache: CacheCoordinator,
    dimensions: usize,
    timeout: Duration,
    counters: Counters,
}

impl EmbeddingEngine {
    /// Build the configured provider chain and cache tiers.
    pub fn from_config(config: &EmbeddingConfig, endpoints: &ProvidersConfig) -> WaypointResult<Self> {
        let mut chain = DegradationChain::new();
        chain.push(providers::create_provider(config, endpoints)?);
        if config.local_fallback && config.provider != "hashed" {
            chain.push(Box::new(HashedEmbeddingProvider::new(config.dimensions)));
        }
        let cache = CacheCoordinator::from_config(config)?;

        info!(
            provider = chain.active_provider_name(),
            dims = config.dimensions,
            l2 = config.l2_cache_path.is_some(),
            "EmbeddingEngine initialized"
        );

        Ok(Self::assemble(chain, cache, config.dimensions, config.timeout_ms))
    }

    /// Engine around a single provider with an L1-only cache.
    pub fn with_provider(provider: Box<dyn IEmbeddingProvider>, timeout: Duration) -> Self {
        let dimensions = provider.dimensions();
        let mut chain = DegradationChain::new();
        chain.push(provider);
        Self::assemble(
            chain,
            CacheCoordinator::memory_only(10_000),
            dimensions,
            timeout.as_millis() as u64,
        )
    }

    /// Offline engine over the hashed provider.
    pub fn hashed(dimensions: usize) -> Self {
        Self::with_provider(
            Box::new(HashedEmbeddingProvider::new(dimensions)),
            Duration::from_secs(5),
        )
    }

    fn assemble(chain: DegradationChain, cache: CacheCoordinator, dimensions: usize, timeout_ms: u64) -> Self {
        Self {
            chain,
            cache,
            dimensions,
            timeout: Duration::from_millis(timeout_ms),
            counters: Counters::default(),
        }
    }

    /// Embed text, falling back to a zero vector.
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        self.embed_with_cancel(text, None).await.vector
    }

    /// Embed text bounded by the provider timeout and an optional
    /// cancellation token.
    pub async fn embed_with_cancel(&self, text: &str, cancel: Option<&CancellationToken>) -> Embedded {
        let normalized = text::normalize(text);
        let key = text::content_hash(&normalized);

        let (cached, tier) = self.cache.get(&key);
        if let Some(vector) = cached {
            match tier {
                CacheHitTier::L1 => self.counters.l1_hits.fetch_add(1, Ordering::Relaxed),
                _ => self.counters.l2_hits.fetch_add(1, Ordering::Relaxed),
            };
            return Embedded {
                vector,
                tier,
                degraded: false,
            };
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);

        match self.compute(&normalized, cancel).await {
            Ok(vector) => {
                if !is_zero(&vector) {
                    self.cache.put(&key, &vector);
                }
                Embedded {
                    vector,
                    tier: CacheHitTier::Miss,
                    degraded: false,
                }
            }
            Err(e) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "embedding failed, using zero vector");
                self.chain
                    .record(DegradationEvent::now("embeddings", e.to_string(), "zero_vector"));
                Embedded {
                    vector: vec![0.0; self.dimensions],
                    tier: CacheHitTier::Miss,
                    degraded: true,
                }
            }
        }
    }

    async fn compute(&self, normalized: &str, cancel: Option<&CancellationToken>) -> Result<Vec<f32>, EmbeddingError> {
        let (vector, provider) = bounded(self.chain.embed(normalized), self.timeout, cancel)
            .await
            .map_err(|interrupted| EmbeddingError::ProviderUnavailable {
                provider: format!("{}: {interrupted}", self.chain.active_provider_name()),
            })??;

        if vector.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        debug!(provider = %provider, "embedding computed");
        Ok(vector)
    }

    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        self.chain.drain_events()
    }

    pub fn active_provider(&self) -> &str {
        self.chain.active_provider_name()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn stats(&self) -> EmbeddingStats {
        EmbeddingStats {
            l1_hits: self.counters.l1_hits.load(Ordering::Relaxed),
            l2_hits: self.counters.l2_hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embed_returns_configured_dims() {
        let engine = EmbeddingEngine::hashed(128);
        assert_eq!(engine.embed("test query").await.len(), 128);
    }

    #[tokio::test]
    async fn second_lookup_hits_l1_after_normalisation() {
        let engine = EmbeddingEngine::hashed(64);
        let a = engine.embed_with_cancel("Cached   Query", None).await;
        let b = engine.embed_with_cancel("cached query", None).await;
        assert_eq!(a.tier, CacheHitTier::Miss);
        assert_eq!(b.tier, CacheHitTier::L1);
        assert_eq!(a.vector, b.vector);
        assert_eq!(engine.stats().l1_hits, 1);
    }

    #[tokio::test]
    async fn cancelled_embed_degrades_to_zero() {
        let engine = EmbeddingEngine::hashed(32);
        let token = CancellationToken::new();
        token.cancel();
        let out = engine.embed_with_cancel("anything", Some(&token)).await;
        assert!(out.degraded);
        assert!(is_zero(&out.vector));
        assert_eq!(engine.drain_degradation_events().len(), 1);
    }
}
