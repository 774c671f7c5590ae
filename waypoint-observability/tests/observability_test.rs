//! Health derivation, degradation alerts, query log retention, and the
//! engine's JSON snapshot.

use std::time::Duration;

use waypoint_core::config::ObservabilityConfig;
use waypoint_core::intent::Intent;
use waypoint_core::models::{DegradationEvent, HealthStatus, RoutingMethod};
use waypoint_observability::degradation::{evaluate_alerts, AlertLevel, DegradationTracker};
use waypoint_observability::health::{HealthReporter, HealthSnapshot, Severity};
use waypoint_observability::{ObservabilityEngine, QueryLog, QueryLogEntry};

fn healthy_snapshot() -> HealthSnapshot {
    HealthSnapshot {
        labeled_examples: 80,
        classifier_trained: true,
        total_requests: 100,
        fallback_count: 5,
        embedding_lookups: 100,
        embedding_failures: 0,
        embedding_cache_hit_rate: 0.8,
        ..Default::default()
    }
}

#[test]
fn healthy_when_everything_is_normal() {
    let report = HealthReporter::build(&healthy_snapshot());
    assert_eq!(report.overall_status, HealthStatus::Healthy);
    assert_eq!(report.subsystems.len(), 5);
    assert!((report.metrics.fallback_rate - 0.05).abs() < 1e-12);
    assert!(HealthReporter::recommendations(&healthy_snapshot()).is_empty());
}

#[test]
fn untrained_classifier_degrades() {
    let snapshot = HealthSnapshot {
        classifier_trained: false,
        ..healthy_snapshot()
    };
    let report = HealthReporter::build(&snapshot);
    assert_eq!(report.overall_status, HealthStatus::Degraded);
    let classifier = report.subsystems.iter().find(|s| s.name == "classifier").unwrap();
    assert_eq!(classifier.status, HealthStatus::Degraded);

    let recs = HealthReporter::recommendations(&snapshot);
    assert!(recs.iter().any(|r| r.action == "run retrain"));
}

#[test]
fn all_embedding_failures_is_unhealthy() {
    let snapshot = HealthSnapshot {
        embedding_failures: 100,
        ..healthy_snapshot()
    };
    assert_eq!(HealthReporter::build(&snapshot).overall_status, HealthStatus::Unhealthy);
}

#[test]
fn empty_store_is_critical() {
    let snapshot = HealthSnapshot {
        labeled_examples: 0,
        ..healthy_snapshot()
    };
    let report = HealthReporter::build(&snapshot);
    assert_eq!(report.overall_status, HealthStatus::Unhealthy);
    let recs = HealthReporter::recommendations(&snapshot);
    assert_eq!(recs[0].severity, Severity::Critical);
}

#[test]
fn unavailable_completion_only_matters_when_configured() {
    let unconfigured = HealthSnapshot {
        completion_configured: false,
        completion_available: false,
        ..healthy_snapshot()
    };
    assert_eq!(HealthReporter::build(&unconfigured).overall_status, HealthStatus::Healthy);

    let configured = HealthSnapshot {
        completion_configured: true,
        completion_available: false,
        ..healthy_snapshot()
    };
    assert_eq!(HealthReporter::build(&configured).overall_status, HealthStatus::Degraded);
}

#[test]
fn frequent_degradations_raise_warning() {
    let mut tracker = DegradationTracker::new();
    for _ in 0..4 {
        tracker.record(DegradationEvent::now("embeddings", "timeout", "zero_vector"));
    }
    tracker.record(DegradationEvent::now("few_shot", "503", "heuristic"));

    let alerts = evaluate_alerts(&tracker);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Warning);
    assert_eq!(alerts[0].component, "embeddings");
}

#[test]
fn long_degradation_is_critical() {
    let mut tracker = DegradationTracker::new();
    let mut event = DegradationEvent::now("embeddings", "timeout", "zero_vector");
    event.timestamp = chrono::Utc::now() - chrono::Duration::hours(25);
    tracker.record(event);
    let alerts = evaluate_alerts(&tracker);
    assert_eq!(alerts[0].level, AlertLevel::Critical);
}

#[test]
fn query_log_keeps_most_recent() {
    let mut log = QueryLog::with_capacity(3);
    for ms in [10, 20, 30, 40] {
        log.record(QueryLogEntry::routed(
            "q",
            Intent::Ask,
            RoutingMethod::Embedding,
            0.8,
            Duration::from_millis(ms),
            false,
        ));
    }
    assert_eq!(log.count(), 3);
    assert_eq!(log.avg_latency(), Duration::from_millis(30));
    assert_eq!(log.latency_percentile(1.0), Duration::from_millis(40));
    assert_eq!(log.latency_percentile(0.0), Duration::from_millis(20));
}

#[test]
fn engine_folds_degradations_into_health() {
    let mut engine = ObservabilityEngine::new(&ObservabilityConfig::default());
    engine.record_degradations(vec![DegradationEvent::now("embeddings", "timeout", "zero_vector")]);

    let report = engine.health_report(healthy_snapshot());
    assert_eq!(report.overall_status, HealthStatus::Degraded);
    assert_eq!(report.metrics.degradation_events, 1);

    engine.mark_recovered("embeddings");
    assert_eq!(engine.health_report(healthy_snapshot()).overall_status, HealthStatus::Healthy);
}

#[test]
fn metrics_snapshot_is_json() {
    let mut engine = ObservabilityEngine::default();
    engine.metrics.retrieval.record_request(Intent::RagQuery, 3, 900, 6000, 0.7);
    engine.log_query(
        QueryLogEntry::routed("q", Intent::RagQuery, RoutingMethod::Classifier, 0.9, Duration::from_millis(12), false)
            .with_evidence(3, 900, 6000),
    );
    let json = engine.metrics_snapshot().unwrap();
    assert_eq!(json["query_log_count"], 1);
    assert_eq!(json["metrics"]["retrieval"]["total_tokens_used"], 900);
}
