//! Degradation alerts.
//!
//! A component that degraded more than [`BURST_LIMIT`] times within
//! [`BURST_WINDOW_SECS`] raises a warning; one that has stayed degraded for
//! longer than [`STUCK_AFTER_HOURS`] is critical. Messages name the tier
//! that is answering in its place.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::tracker::DegradationTracker;

pub const BURST_WINDOW_SECS: i64 = 3_600;
pub const BURST_LIMIT: usize = 3;
pub const STUCK_AFTER_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationAlert {
    pub level: AlertLevel,
    pub component: String,
    pub message: String,
}

/// What routing loses while `component` is degraded.
fn impact(component: &str) -> &'static str {
    match component {
        "embeddings" => "queries embed as zero vectors, so the neighbour vote and classifier are skipped",
        "few_shot" => "low-confidence requests are answered by the keyword heuristic",
        "retrieval" => "instructions are built without document evidence",
        _ => "its fallback is answering instead",
    }
}

/// One alert per component, most severe first.
pub fn evaluate_alerts(tracker: &DegradationTracker) -> Vec<DegradationAlert> {
    let components: BTreeSet<&str> = tracker
        .events()
        .iter()
        .map(|t| t.event.component.as_str())
        .collect();

    let mut alerts: Vec<DegradationAlert> = components
        .into_iter()
        .filter_map(|component| {
            let stuck = tracker
                .degraded_duration(component)
                .is_some_and(|d| d > chrono::Duration::hours(STUCK_AFTER_HOURS));
            let recent = tracker.count_recent(component, BURST_WINDOW_SECS);

            let (level, summary) = if stuck {
                (
                    AlertLevel::Critical,
                    format!("{component} has been degraded for over {STUCK_AFTER_HOURS} hours"),
                )
            } else if recent > BURST_LIMIT {
                (
                    AlertLevel::Warning,
                    format!("{component} degraded {recent} times in the last hour"),
                )
            } else {
                return None;
            };
            Some(DegradationAlert {
                level,
                component: component.to_string(),
                message: format!("{summary}; {}", impact(component)),
            })
        })
        .collect();

    alerts.sort_by(|a, b| b.level.cmp(&a.level));
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::models::DegradationEvent;

    #[test]
    fn quiet_tracker_raises_nothing() {
        let mut tracker = DegradationTracker::new();
        tracker.record(DegradationEvent::now("few_shot", "503", "heuristic"));
        assert!(evaluate_alerts(&tracker).is_empty());
    }

    #[test]
    fn message_names_the_replacement_tier() {
        let mut tracker = DegradationTracker::new();
        for _ in 0..=BURST_LIMIT {
            tracker.record(DegradationEvent::now("few_shot", "timeout", "heuristic"));
        }
        let alerts = evaluate_alerts(&tracker);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("keyword heuristic"));
    }
}
