//! Aggregate health report generation.

use waypoint_core::models::{HealthMetrics, HealthReport, HealthStatus, SubsystemHealth};

use super::recommendations::Recommendation;
use super::subsystem_checks::SubsystemChecker;

/// Point-in-time figures a health report is derived from.
#[derive(Debug, Clone, Default)]
pub struct HealthSnapshot {
    pub labeled_examples: usize,
    pub classifier_trained: bool,
    pub total_requests: u64,
    pub fallback_count: u64,
    pub embedding_lookups: u64,
    pub embedding_failures: u64,
    pub embedding_cache_hit_rate: f64,
    /// Components with an unrecovered degradation.
    pub degraded_components: Vec<String>,
    pub degradation_events: usize,
    pub completion_configured: bool,
    pub completion_available: bool,
}

impl HealthSnapshot {
    pub fn fallback_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.fallback_count as f64 / self.total_requests as f64
        }
    }
}

pub struct HealthReporter;

impl HealthReporter {
    pub fn build(snapshot: &HealthSnapshot) -> HealthReport {
        let subsystems = SubsystemChecker::check_all(snapshot);
        let overall_status = Self::derive_overall(&subsystems);

        HealthReport {
            overall_status,
            subsystems,
            metrics: HealthMetrics {
                labeled_examples: snapshot.labeled_examples,
                classifier_trained: snapshot.classifier_trained,
                total_requests: snapshot.total_requests,
                fallback_rate: snapshot.fallback_rate(),
                embedding_cache_hit_rate: snapshot.embedding_cache_hit_rate,
                degradation_events: snapshot.degradation_events,
            },
        }
    }

    pub fn recommendations(snapshot: &HealthSnapshot) -> Vec<Recommendation> {
        super::recommendations::generate(snapshot)
    }

    /// Unhealthy if any subsystem is, degraded if any is, else healthy.
    fn derive_overall(subsystems: &[SubsystemHealth]) -> HealthStatus {
        let mut worst = HealthStatus::Healthy;
        for s in subsystems {
            match s.status {
                HealthStatus::Unhealthy => return HealthStatus::Unhealthy,
                HealthStatus::Degraded => worst = HealthStatus::Degraded,
                HealthStatus::Healthy => {}
            }
        }
        worst
    }
}
