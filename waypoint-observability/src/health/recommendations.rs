//! Actionable recommendations derived from a health snapshot.

use serde::{Deserialize, Serialize};

use super::reporter::HealthSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub message: String,
    pub action: String,
}

pub fn generate(snapshot: &HealthSnapshot) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if snapshot.labeled_examples == 0 {
        recs.push(Recommendation {
            severity: Severity::Critical,
            message: "labeled example store is empty".into(),
            action: "enable seed examples or record feedback".into(),
        });
    }

    if !snapshot.classifier_trained && snapshot.labeled_examples > 0 {
        recs.push(Recommendation {
            severity: Severity::Warning,
            message: format!(
                "classifier untrained with {} labeled examples available",
                snapshot.labeled_examples
            ),
            action: "run retrain".into(),
        });
    }

    if snapshot.embedding_lookups > 0 && snapshot.embedding_cache_hit_rate < 0.30 {
        recs.push(Recommendation {
            severity: Severity::Info,
            message: format!(
                "embedding cache hit rate is {:.0}%",
                snapshot.embedding_cache_hit_rate * 100.0
            ),
            action: "consider enabling the persistent L2 cache".into(),
        });
    }

    if snapshot.total_requests > 0 && snapshot.fallback_rate() > 0.5 {
        recs.push(Recommendation {
            severity: Severity::Warning,
            message: format!(
                "{:.0}% of requests fell back to a low-confidence tier",
                snapshot.fallback_rate() * 100.0
            ),
            action: "add feedback examples and retrain".into(),
        });
    }

    recs
}
