//! Metrics registry.
//!
//! [`RouterMetricsCollector`] is shared with the router and locks
//! internally. [`MetricsCollector`] holds the remaining per-domain metrics
//! and is owned by the [`crate::ObservabilityEngine`].

pub mod embedding_metrics;
pub mod retrieval_metrics;
pub mod router_metrics;

pub use embedding_metrics::EmbeddingMetrics;
pub use retrieval_metrics::RetrievalMetrics;
pub use router_metrics::{RequestOutcome, RouterMetrics, RouterMetricsCollector};

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MetricsCollector {
    pub retrieval: RetrievalMetrics,
    pub embedding: EmbeddingMetrics,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
