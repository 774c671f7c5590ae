//! Structured log events for key router operations.
//!
//! Each function emits a `tracing` event with structured fields.

use waypoint_core::intent::Intent;
use waypoint_core::models::RoutingMethod;

/// Log a completed intent classification.
pub fn intent_classified(intent: Intent, confidence: f64, method: RoutingMethod, latency_ms: u64) {
    tracing::info!(
        event = "intent_classified",
        intent = %intent,
        confidence = confidence,
        method = method.as_str(),
        latency_ms = latency_ms,
        "intent classified"
    );
}

/// Log the cascade dropping to a lower tier.
pub fn tier_fallback(from: &str, to: &str, reason: &str) {
    tracing::debug!(
        event = "tier_fallback",
        from = %from,
        to = %to,
        reason = %reason,
        "tier fallback"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a labeled example written from user feedback.
pub fn feedback_recorded(correct: Intent, predicted: Intent, stored: bool) {
    tracing::info!(
        event = "feedback_recorded",
        correct = %correct,
        predicted = %predicted,
        stored = stored,
        "feedback recorded"
    );
}

/// Log a classifier retrain.
pub fn classifier_retrained(examples: usize, accuracy: f64, converged: bool) {
    tracing::info!(
        event = "classifier_retrained",
        examples = examples,
        accuracy = accuracy,
        converged = converged,
        "classifier retrained"
    );
}

/// Log evidence assembly for one request.
pub fn evidence_packed(candidates: usize, packed: usize, tokens_used: usize, budget: usize) {
    tracing::info!(
        event = "evidence_packed",
        candidates = candidates,
        packed = packed,
        tokens_used = tokens_used,
        budget = budget,
        "evidence packed"
    );
}

/// Log an instruction verification outcome.
pub fn instruction_verified(task: &str, is_valid: bool, errors: usize, warnings: usize) {
    if is_valid {
        tracing::info!(
            event = "instruction_verified",
            task = %task,
            errors = errors,
            warnings = warnings,
            "instruction verified"
        );
    } else {
        tracing::warn!(
            event = "instruction_rejected",
            task = %task,
            errors = errors,
            warnings = warnings,
            "instruction failed verification"
        );
    }
}
