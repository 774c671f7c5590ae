//! Bounded web search.

use std::collections::HashSet;
use std::time::Duration;

use tracing::warn;
use waypoint_core::cancellation::{bounded, CancellationToken};
use waypoint_core::models::WebResult;
use waypoint_core::traits::IWebSearchProvider;

use super::vector_search::clamp_unit;

/// Up to `top_k` results ranked by score, deduplicated by URL keeping the
/// best score. Failures, timeouts, and cancellation yield an empty list.
pub async fn search_web(
    provider: &dyn IWebSearchProvider,
    query: &str,
    top_k: usize,
    timeout: Duration,
    cancel: Option<&CancellationToken>,
) -> Vec<WebResult> {
    if top_k == 0 || query.trim().is_empty() {
        return Vec::new();
    }

    let results = match bounded(provider.search(query, top_k), timeout, cancel).await {
        Ok(Ok(results)) => results,
        Ok(Err(e)) => {
            warn!(provider = provider.name(), error = %e, "web search failed");
            return Vec::new();
        }
        Err(interrupted) => {
            warn!(provider = provider.name(), %interrupted, "web search interrupted");
            return Vec::new();
        }
    };

    let mut results: Vec<WebResult> = results
        .into_iter()
        .filter(|r| !r.url.trim().is_empty())
        .map(|mut r| {
            r.score = clamp_unit(r.score);
            r
        })
        .collect();
    results.sort_by(|a, b| b.score.total_cmp(&a.score));

    // Sorted first, so the kept duplicate is the best-scored one.
    let mut seen = HashSet::new();
    results.retain(|r| seen.insert(r.url.clone()));
    results.truncate(top_k);
    results
}
