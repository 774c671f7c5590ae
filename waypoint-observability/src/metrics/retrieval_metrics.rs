//! Per-intent evidence hit rate, token efficiency, and coverage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use waypoint_core::intent::Intent;

/// Tracks evidence assembly effectiveness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalMetrics {
    /// Requests that packed at least one chunk, per intent.
    pub hits_by_intent: BTreeMap<Intent, u64>,
    pub requests_by_intent: BTreeMap<Intent, u64>,
    pub total_tokens_used: u64,
    pub total_tokens_budgeted: u64,
    /// Chunks that were expansion siblings or parents.
    pub expanded_chunks: u64,
    /// Chunks cut at the budget boundary.
    pub truncations: u64,
    pub verification_failures: u64,
    coverage_sum: f64,
    coverage_samples: u64,
}

impl RetrievalMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one evidence assembly.
    pub fn record_request(
        &mut self,
        intent: Intent,
        packed: usize,
        tokens_used: u64,
        budget: u64,
        coverage: f64,
    ) {
        *self.requests_by_intent.entry(intent).or_default() += 1;
        if packed > 0 {
            *self.hits_by_intent.entry(intent).or_default() += 1;
        }
        self.total_tokens_used += tokens_used;
        self.total_tokens_budgeted += budget;
        self.coverage_sum += coverage;
        self.coverage_samples += 1;
    }

    pub fn record_expansion(&mut self, added: usize) {
        self.expanded_chunks += added as u64;
    }

    pub fn record_truncation(&mut self) {
        self.truncations += 1;
    }

    pub fn record_verification(&mut self, is_valid: bool) {
        if !is_valid {
            self.verification_failures += 1;
        }
    }

    /// Share of requests for `intent` that packed any evidence.
    pub fn hit_rate(&self, intent: Intent) -> f64 {
        let requests = self.requests_by_intent.get(&intent).copied().unwrap_or(0);
        if requests == 0 {
            return 0.0;
        }
        let hits = self.hits_by_intent.get(&intent).copied().unwrap_or(0);
        hits as f64 / requests as f64
    }

    /// Overall token efficiency (used / budgeted).
    pub fn token_efficiency(&self) -> f64 {
        if self.total_tokens_budgeted == 0 {
            return 0.0;
        }
        self.total_tokens_used as f64 / self.total_tokens_budgeted as f64
    }

    pub fn mean_coverage(&self) -> f64 {
        if self.coverage_samples == 0 {
            0.0
        } else {
            self.coverage_sum / self.coverage_samples as f64
        }
    }
}
