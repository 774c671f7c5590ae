use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::Intent;

/// What an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EditTarget {
    Selection,
    File,
    Section,
}

/// The shape of output the caller should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    #[default]
    Answer,
    Links,
    Summary,
    Diff,
    Patch,
}

/// Structured parameters extracted alongside the intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct Slots {
    pub topic: Option<String>,
    pub needs_recency: bool,
    pub target_docs: Vec<String>,
    pub edit_target: Option<EditTarget>,
    pub outputs: OutputKind,
}

/// A routed query: intent, calibrated confidence, and slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IntentClassification {
    pub intent: Intent,
    /// Always within [0, 1].
    pub confidence: f64,
    pub slots: Slots,
}

impl IntentClassification {
    /// Build a classification, clamping confidence into [0, 1].
    /// NaN becomes 0.
    pub fn new(intent: Intent, confidence: f64, slots: Slots) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            intent,
            confidence,
            slots,
        }
    }

    /// The low-confidence `ask` returned when nothing better is available.
    pub fn safe_fallback() -> Self {
        Self::new(
            Intent::Ask,
            crate::constants::SAFE_FALLBACK_CONFIDENCE,
            Slots::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(IntentClassification::new(Intent::Ask, 1.7, Slots::default()).confidence, 1.0);
        assert_eq!(IntentClassification::new(Intent::Ask, -0.2, Slots::default()).confidence, 0.0);
        assert_eq!(IntentClassification::new(Intent::Ask, f64::NAN, Slots::default()).confidence, 0.0);
    }

    #[test]
    fn slots_deserialize_with_missing_fields() {
        let slots: Slots = serde_json::from_str(r#"{"topic":"rust"}"#).unwrap();
        assert_eq!(slots.topic.as_deref(), Some("rust"));
        assert!(!slots.needs_recency);
        assert_eq!(slots.outputs, OutputKind::Answer);
    }
}
