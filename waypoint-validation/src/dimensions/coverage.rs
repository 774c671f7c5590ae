//! Coverage adequacy against the configured thresholds.

use waypoint_core::config::VerifierConfig;
use waypoint_core::models::TaskKind;

use super::Findings;

/// Outcome of the coverage check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageCheck {
    pub adequate: bool,
    pub findings: Findings,
}

/// Tasks that tolerate thin evidence use `relaxed_coverage` and only warn.
/// Other evidence tasks use `min_coverage` and fail when coverage is
/// required. Plain answers carry no coverage requirement.
pub fn check(task: TaskKind, coverage: f64, config: &VerifierConfig) -> CoverageCheck {
    let mut result = CoverageCheck {
        adequate: true,
        findings: Findings::default(),
    };
    if !task.requires_evidence() && !task.allows_low_coverage() {
        return result;
    }

    let coverage = if coverage.is_finite() { coverage } else { 0.0 };
    let threshold = if task.allows_low_coverage() {
        config.relaxed_coverage
    } else {
        config.min_coverage
    };
    if coverage >= threshold {
        return result;
    }

    result.adequate = false;
    let message = format!(
        "coverage {coverage:.2} is below the {threshold:.2} threshold for {task} tasks"
    );
    if task.allows_low_coverage() || !config.require_coverage {
        result.findings.warn(message);
    } else {
        result.findings.error(message);
    }
    result
}
