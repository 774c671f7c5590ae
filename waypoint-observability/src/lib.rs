//! # waypoint-observability
//!
//! Structured tracing with span definitions, router/retrieval/embedding
//! metrics, degradation tracking with alerting, a bounded query log, and
//! health reporting across the router's subsystems.

pub mod degradation;
pub mod engine;
pub mod health;
pub mod metrics;
pub mod query_log;
pub mod tracing_setup;

pub use engine::ObservabilityEngine;
pub use health::{HealthReporter, HealthSnapshot};
pub use metrics::{MetricsCollector, RouterMetrics, RouterMetricsCollector};
pub use query_log::{QueryLog, QueryLogEntry};
