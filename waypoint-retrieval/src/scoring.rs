//! Retrieval confidence and evidence coverage.

use std::collections::HashSet;

use waypoint_core::models::{RagChunk, TaskKind};

/// Weight of the mean score in `confidence`.
const MEAN_WEIGHT: f64 = 0.7;
/// Weight of the best score in `confidence`.
const MAX_WEIGHT: f64 = 0.3;
/// Source-diversity factor with no distinct sources.
const DIVERSITY_BASE: f64 = 0.5;
const DIVERSITY_PER_SOURCE: f64 = 0.25;
const WEB_PER_RESULT: f64 = 0.1;
const WEB_CAP: f64 = 0.3;
/// Coverage floor for tasks that tolerate thin evidence, once any evidence exists.
const LOW_COVERAGE_FLOOR: f64 = 0.3;

/// `min(1, 0.7 * mean + 0.3 * max)` over chunk scores; 0 when empty.
/// Scores are clamped to [0, 1] and NaN counts as 0.
pub fn confidence(chunks: &[RagChunk]) -> f64 {
    if chunks.is_empty() {
        return 0.0;
    }
    let scores = chunks.iter().map(|c| clamp_score(c.score));
    let (sum, max) = scores.fold((0.0, 0.0f64), |(sum, max), s| (sum + s, max.max(s)));
    let mean = sum / chunks.len() as f64;
    (MEAN_WEIGHT * mean + MAX_WEIGHT * max).min(1.0)
}

/// Aggregate evidence coverage in [0, 1].
///
/// Retrieval confidence is scaled by how many distinct documents back it,
/// then web results add a capped bonus. Tasks that may lean on general
/// knowledge get a floor once any evidence was found.
pub fn coverage(chunks: &[RagChunk], web_results: usize, task: TaskKind) -> f64 {
    let sources = distinct_sources(chunks);
    let diversity = (DIVERSITY_BASE + DIVERSITY_PER_SOURCE * sources as f64).min(1.0);
    let web = (WEB_PER_RESULT * web_results as f64).min(WEB_CAP);
    let mut value = (confidence(chunks) * diversity + web).min(1.0);

    let has_evidence = !chunks.is_empty() || web_results > 0;
    if task.allows_low_coverage() && has_evidence {
        value = value.max(LOW_COVERAGE_FLOOR);
    }
    value
}

/// Number of distinct documents among `chunks`.
pub fn distinct_sources(chunks: &[RagChunk]) -> usize {
    chunks
        .iter()
        .map(|c| c.doc_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(doc: &str, score: f64) -> RagChunk {
        RagChunk {
            id: format!("{doc}-{score}"),
            doc_id: doc.to_string(),
            anchor: String::new(),
            text: "text".to_string(),
            score,
            headings: vec![],
            updated_at: None,
            tokens: 1,
        }
    }

    #[test]
    fn empty_confidence_is_zero() {
        assert_eq!(confidence(&[]), 0.0);
    }

    #[test]
    fn confidence_blends_mean_and_max() {
        let c = confidence(&[scored("a", 0.8), scored("b", 0.4)]);
        assert!((c - (0.7 * 0.6 + 0.3 * 0.8)).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        assert_eq!(confidence(&[scored("a", 3.0)]), 1.0);
        assert_eq!(confidence(&[scored("a", f64::NAN)]), 0.0);
    }

    #[test]
    fn more_sources_raise_coverage() {
        let one = coverage(&[scored("a", 0.8), scored("a", 0.8)], 0, TaskKind::RagAnswer);
        let two = coverage(&[scored("a", 0.8), scored("b", 0.8)], 0, TaskKind::RagAnswer);
        assert!(two > one);
        assert!((one - 0.8 * 0.75).abs() < 1e-12);
        assert!((two - 0.8).abs() < 1e-12);
    }

    #[test]
    fn web_bonus_is_capped() {
        let none = coverage(&[], 0, TaskKind::WebAnswer);
        let many = coverage(&[], 10, TaskKind::WebAnswer);
        assert_eq!(none, 0.0);
        assert!((many - 0.3).abs() < 1e-12);
    }

    #[test]
    fn writing_tasks_get_a_floor_only_with_evidence() {
        assert_eq!(coverage(&[], 0, TaskKind::Write), 0.0);
        let weak = coverage(&[scored("a", 0.1)], 0, TaskKind::Write);
        assert!((weak - 0.3).abs() < 1e-12);
        let same = coverage(&[scored("a", 0.1)], 0, TaskKind::RagAnswer);
        assert!(same < 0.3);
    }
}
