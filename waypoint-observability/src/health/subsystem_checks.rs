//! Per-subsystem checks: embeddings, example store, classifier, completion
//! tier, routing.

use waypoint_core::models::{HealthStatus, SubsystemHealth};

use super::reporter::HealthSnapshot;

/// Requests needed before the fallback rate is judged.
const MIN_REQUESTS_FOR_RATE: u64 = 20;

pub struct SubsystemChecker;

impl SubsystemChecker {
    pub fn check_all(snapshot: &HealthSnapshot) -> Vec<SubsystemHealth> {
        vec![
            Self::check_embeddings(snapshot),
            Self::check_examples(snapshot),
            Self::check_classifier(snapshot),
            Self::check_completion(snapshot),
            Self::check_routing(snapshot),
        ]
    }

    /// Unhealthy when every lookup failed, degraded while a degradation is
    /// active.
    fn check_embeddings(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let active = snapshot.degraded_components.iter().any(|c| c == "embeddings");
        let (status, message) = if snapshot.embedding_lookups > 0
            && snapshot.embedding_failures == snapshot.embedding_lookups
        {
            (
                HealthStatus::Unhealthy,
                Some("every embedding lookup failed".to_string()),
            )
        } else if active {
            (
                HealthStatus::Degraded,
                Some("embedding provider degraded to zero vectors".to_string()),
            )
        } else {
            (HealthStatus::Healthy, None)
        };
        health("embeddings", status, message)
    }

    fn check_examples(snapshot: &HealthSnapshot) -> SubsystemHealth {
        if snapshot.labeled_examples == 0 {
            health(
                "examples",
                HealthStatus::Unhealthy,
                Some("no labeled examples; the embedding tier cannot vote".to_string()),
            )
        } else {
            health("examples", HealthStatus::Healthy, None)
        }
    }

    fn check_classifier(snapshot: &HealthSnapshot) -> SubsystemHealth {
        if snapshot.classifier_trained {
            health("classifier", HealthStatus::Healthy, None)
        } else {
            health(
                "classifier",
                HealthStatus::Degraded,
                Some("linear classifier untrained".to_string()),
            )
        }
    }

    /// Not configured is healthy: the cascade runs on the heuristic.
    fn check_completion(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let degraded = snapshot.degraded_components.iter().any(|c| c == "few_shot");
        if snapshot.completion_configured && (!snapshot.completion_available || degraded) {
            health(
                "completion",
                HealthStatus::Degraded,
                Some("completion provider unavailable; heuristic in use".to_string()),
            )
        } else {
            health("completion", HealthStatus::Healthy, None)
        }
    }

    fn check_routing(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let rate = snapshot.fallback_rate();
        if snapshot.total_requests >= MIN_REQUESTS_FOR_RATE && rate > 0.5 {
            health(
                "routing",
                HealthStatus::Degraded,
                Some(format!("{:.0}% of requests used a fallback", rate * 100.0)),
            )
        } else {
            health("routing", HealthStatus::Healthy, None)
        }
    }
}

fn health(name: &str, status: HealthStatus, message: Option<String>) -> SubsystemHealth {
    SubsystemHealth {
        name: name.to_string(),
        status,
        message,
    }
}
