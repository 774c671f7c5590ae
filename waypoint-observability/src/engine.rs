//! [`ObservabilityEngine`] owns the metrics, degradation tracker and query
//! log that are not shared with the router.

use waypoint_core::config::ObservabilityConfig;
use waypoint_core::errors::WaypointResult;
use waypoint_core::models::{DegradationEvent, HealthReport};

use crate::degradation::{evaluate_alerts, DegradationAlert, DegradationTracker};
use crate::health::{HealthReporter, HealthSnapshot, Recommendation};
use crate::metrics::MetricsCollector;
use crate::query_log::{QueryLog, QueryLogEntry};

#[derive(Debug)]
pub struct ObservabilityEngine {
    pub metrics: MetricsCollector,
    pub degradation: DegradationTracker,
    pub query_log: QueryLog,
}

impl ObservabilityEngine {
    pub fn new(config: &ObservabilityConfig) -> Self {
        Self {
            metrics: MetricsCollector::new(),
            degradation: DegradationTracker::new(),
            query_log: QueryLog::with_capacity(config.query_log_capacity),
        }
    }

    pub fn health_report(&self, mut snapshot: HealthSnapshot) -> HealthReport {
        snapshot.degraded_components = self.degradation.degraded_components();
        snapshot.degradation_events = self.degradation.events().len();
        HealthReporter::build(&snapshot)
    }

    pub fn recommendations(&self, snapshot: &HealthSnapshot) -> Vec<Recommendation> {
        HealthReporter::recommendations(snapshot)
    }

    pub fn record_degradation(&mut self, event: DegradationEvent) {
        self.degradation.record(event);
    }

    /// Record a batch of drained events.
    pub fn record_degradations(&mut self, events: impl IntoIterator<Item = DegradationEvent>) {
        for event in events {
            self.degradation.record(event);
        }
    }

    pub fn mark_recovered(&mut self, component: &str) {
        self.degradation.mark_recovered(component);
    }

    pub fn degradation_alerts(&self) -> Vec<DegradationAlert> {
        evaluate_alerts(&self.degradation)
    }

    pub fn log_query(&mut self, entry: QueryLogEntry) {
        self.query_log.record(entry);
    }

    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Current metrics and query log state as JSON.
    pub fn metrics_snapshot(&self) -> WaypointResult<serde_json::Value> {
        let metrics_json = serde_json::to_value(&self.metrics)?;
        Ok(serde_json::json!({
            "metrics": metrics_json,
            "query_log_count": self.query_log.count(),
            "query_avg_latency_ms": self.query_log.avg_latency().as_millis() as u64,
            "active_degradations": self.degradation.degraded_components(),
        }))
    }
}

impl Default for ObservabilityEngine {
    fn default() -> Self {
        Self::new(&ObservabilityConfig::default())
    }
}
