//! Per-intent aggregation over nearest neighbours.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use waypoint_core::intent::Intent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentStats {
    pub count: usize,
    pub avg_confidence: f64,
    pub max_similarity: f64,
}

/// Neighbour vote over the top-k similar examples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentDistribution {
    pub stats: BTreeMap<Intent, IntentStats>,
    /// Neighbours counted, including those that voted for nothing.
    pub total: usize,
}

impl IntentDistribution {
    /// Fold one neighbour into the distribution.
    pub fn observe(&mut self, intent: Intent, confidence: f64, similarity: f64) {
        let entry = self.stats.entry(intent).or_default();
        let n = entry.count as f64;
        entry.avg_confidence = (entry.avg_confidence * n + confidence) / (n + 1.0);
        entry.max_similarity = if entry.count == 0 {
            similarity
        } else {
            entry.max_similarity.max(similarity)
        };
        entry.count += 1;
        self.total += 1;
    }

    /// Count a neighbour that shares nothing with the query.
    pub fn abstain(&mut self) {
        self.total += 1;
    }

    /// Intent with the most votes. Ties go to the higher max similarity,
    /// then to the fixed intent order.
    pub fn top_intent(&self) -> Option<Intent> {
        let mut best: Option<(Intent, &IntentStats)> = None;
        for intent in Intent::ALL {
            let Some(stats) = self.stats.get(&intent) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((_, b)) => {
                    stats.count > b.count
                        || (stats.count == b.count && stats.max_similarity > b.max_similarity)
                }
            };
            if better {
                best = Some((intent, stats));
            }
        }
        best.map(|(intent, _)| intent)
    }

    /// `max_count / total`, 0 when no neighbours were found.
    pub fn confidence(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let max = self.stats.values().map(|s| s.count).max().unwrap_or(0);
        max as f64 / self.total as f64
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_distribution_has_zero_confidence() {
        let d = IntentDistribution::default();
        assert_eq!(d.confidence(), 0.0);
        assert_eq!(d.top_intent(), None);
    }

    #[test]
    fn majority_wins() {
        let mut d = IntentDistribution::default();
        for _ in 0..7 {
            d.observe(Intent::WebSearch, 1.0, 0.6);
        }
        for _ in 0..3 {
            d.observe(Intent::Ask, 0.5, 0.9);
        }
        assert_eq!(d.top_intent(), Some(Intent::WebSearch));
        assert!((d.confidence() - 0.7).abs() < 1e-12);
        let ask = d.stats[&Intent::Ask];
        assert_eq!(ask.count, 3);
        assert!((ask.avg_confidence - 0.5).abs() < 1e-12);
        assert!((ask.max_similarity - 0.9).abs() < 1e-12);
    }

    #[test]
    fn tie_goes_to_higher_similarity() {
        let mut d = IntentDistribution::default();
        d.observe(Intent::Ask, 1.0, 0.4);
        d.observe(Intent::RagQuery, 1.0, 0.8);
        assert_eq!(d.top_intent(), Some(Intent::RagQuery));
        assert!((d.confidence() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn abstentions_dilute_confidence() {
        let mut d = IntentDistribution::default();
        d.observe(Intent::EditRequest, 1.0, 0.3);
        for _ in 0..9 {
            d.abstain();
        }
        assert_eq!(d.total, 10);
        assert_eq!(d.top_intent(), Some(Intent::EditRequest));
        assert!((d.confidence() - 0.1).abs() < 1e-12);
    }
}
