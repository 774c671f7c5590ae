//! Per-request log: query, routed intent and method, latency, evidence
//! packed, tokens used against budget.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use waypoint_core::intent::Intent;
use waypoint_core::models::RoutingMethod;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query: String,
    pub intent: Intent,
    pub method: RoutingMethod,
    pub confidence: f64,
    pub latency: Duration,
    pub fallback_used: bool,
    /// Chunks packed into the instruction; 0 when no evidence was built.
    pub result_count: usize,
    pub token_budget: usize,
    pub tokens_used: usize,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    /// A routing-only entry stamped with the current time.
    pub fn routed(
        query: impl Into<String>,
        intent: Intent,
        method: RoutingMethod,
        confidence: f64,
        latency: Duration,
        fallback_used: bool,
    ) -> Self {
        Self {
            query: query.into(),
            intent,
            method,
            confidence,
            latency,
            fallback_used,
            result_count: 0,
            token_budget: 0,
            tokens_used: 0,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Attach evidence figures.
    pub fn with_evidence(mut self, result_count: usize, tokens_used: usize, token_budget: usize) -> Self {
        self.result_count = result_count;
        self.tokens_used = tokens_used;
        self.token_budget = token_budget;
        self
    }
}

/// Ring buffer of recent requests.
#[derive(Debug, Clone)]
pub struct QueryLog {
    entries: VecDeque<QueryLogEntry>,
    max_entries: usize,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::with_capacity(waypoint_core::config::defaults::DEFAULT_QUERY_LOG_CAPACITY)
    }
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn record(&mut self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            intent = %entry.intent,
            method = entry.method.as_str(),
            latency_ms = entry.latency.as_millis() as u64,
            result_count = entry.result_count,
            tokens_used = entry.tokens_used,
            "query logged"
        );
        if self.entries.len() == self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueryLogEntry> {
        self.entries.iter()
    }

    pub fn avg_latency(&self) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.entries.iter().map(|e| e.latency).sum();
        total / self.entries.len() as u32
    }

    /// Latency at the given percentile (0.0–1.0).
    pub fn latency_percentile(&self, p: f64) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let mut latencies: Vec<Duration> = self.entries.iter().map(|e| e.latency).collect();
        latencies.sort();
        let idx = ((p * (latencies.len() - 1) as f64).round() as usize).min(latencies.len() - 1);
        latencies[idx]
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}
