//! Per-request routing metrics: totals, per-method hits, mean confidence,
//! mean latency, intent histogram, fallback count.
//!
//! All counters sit behind one `Mutex` and are updated together, so a
//! snapshot never mixes two requests' worth of state.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use waypoint_core::intent::Intent;
use waypoint_core::models::RoutingMethod;

/// Read-only copy of the router counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterMetrics {
    pub total_requests: u64,
    pub classifier_hits: u64,
    pub embedding_hits: u64,
    pub meta_classifier_hits: u64,
    /// Requests that returned a fallback classification.
    pub fallback_count: u64,
    /// Requests that invoked the completion tier.
    pub meta_invocations: u64,
    pub mean_confidence: f64,
    pub mean_latency_ms: f64,
    pub intent_histogram: BTreeMap<Intent, u64>,
    pub feedback_received: u64,
    pub feedback_stored: u64,
}

impl RouterMetrics {
    pub fn fallback_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.fallback_count as f64 / self.total_requests as f64
        }
    }

    pub fn hits(&self, method: RoutingMethod) -> u64 {
        match method {
            RoutingMethod::Classifier => self.classifier_hits,
            RoutingMethod::Embedding => self.embedding_hits,
            RoutingMethod::MetaClassifier => self.meta_classifier_hits,
        }
    }
}

/// One routed request, as seen by the metrics.
#[derive(Debug, Clone, Copy)]
pub struct RequestOutcome {
    pub method: RoutingMethod,
    pub intent: Intent,
    pub confidence: f64,
    pub latency_ms: u64,
    pub fallback_used: bool,
    pub meta_invoked: bool,
}

#[derive(Debug, Default)]
struct State {
    metrics: RouterMetrics,
    confidence_sum: f64,
    latency_sum_ms: u64,
}

/// Thread-safe router metrics.
#[derive(Debug, Default)]
pub struct RouterMetricsCollector {
    state: Mutex<State>,
}

impl RouterMetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one request into the running totals.
    pub fn record(&self, outcome: RequestOutcome) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.confidence_sum += outcome.confidence;
        state.latency_sum_ms += outcome.latency_ms;

        let State {
            metrics,
            confidence_sum,
            latency_sum_ms,
        } = &mut *state;
        metrics.total_requests += 1;
        match outcome.method {
            RoutingMethod::Classifier => metrics.classifier_hits += 1,
            RoutingMethod::Embedding => metrics.embedding_hits += 1,
            RoutingMethod::MetaClassifier => metrics.meta_classifier_hits += 1,
        }
        if outcome.fallback_used {
            metrics.fallback_count += 1;
        }
        if outcome.meta_invoked {
            metrics.meta_invocations += 1;
        }
        *metrics.intent_histogram.entry(outcome.intent).or_default() += 1;

        let n = metrics.total_requests as f64;
        metrics.mean_confidence = *confidence_sum / n;
        metrics.mean_latency_ms = *latency_sum_ms as f64 / n;
    }

    pub fn record_feedback(&self, stored: bool) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.metrics.feedback_received += 1;
        if stored {
            state.metrics.feedback_stored += 1;
        }
    }

    pub fn snapshot(&self) -> RouterMetrics {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .metrics
            .clone()
    }

    pub fn reset(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = State::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(method: RoutingMethod, intent: Intent, confidence: f64, latency_ms: u64) -> RequestOutcome {
        RequestOutcome {
            method,
            intent,
            confidence,
            latency_ms,
            fallback_used: false,
            meta_invoked: false,
        }
    }

    #[test]
    fn running_means_and_histogram() {
        let c = RouterMetricsCollector::new();
        c.record(outcome(RoutingMethod::Classifier, Intent::Ask, 0.9, 10));
        c.record(outcome(RoutingMethod::Embedding, Intent::Ask, 0.7, 30));
        c.record(RequestOutcome {
            fallback_used: true,
            ..outcome(RoutingMethod::MetaClassifier, Intent::WebSearch, 0.2, 20)
        });

        let m = c.snapshot();
        assert_eq!(m.total_requests, 3);
        assert_eq!(m.hits(RoutingMethod::Classifier), 1);
        assert_eq!(m.hits(RoutingMethod::Embedding), 1);
        assert_eq!(m.hits(RoutingMethod::MetaClassifier), 1);
        assert!((m.mean_confidence - 0.6).abs() < 1e-12);
        assert!((m.mean_latency_ms - 20.0).abs() < 1e-12);
        assert_eq!(m.intent_histogram[&Intent::Ask], 2);
        assert_eq!(m.fallback_count, 1);
        assert!((m.fallback_rate() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn feedback_counts_and_reset() {
        let c = RouterMetricsCollector::new();
        c.record_feedback(true);
        c.record_feedback(false);
        assert_eq!(c.snapshot().feedback_received, 2);
        assert_eq!(c.snapshot().feedback_stored, 1);
        c.reset();
        assert_eq!(c.snapshot(), RouterMetrics::default());
    }

    #[test]
    fn concurrent_records_are_not_lost() {
        let c = RouterMetricsCollector::new();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..250 {
                        c.record(outcome(RoutingMethod::Embedding, Intent::Other, 0.5, 1));
                    }
                });
            }
        });
        let m = c.snapshot();
        assert_eq!(m.total_requests, 1000);
        assert_eq!(m.embedding_hits, 1000);
        assert!((m.mean_confidence - 0.5).abs() < 1e-9);
    }
}
