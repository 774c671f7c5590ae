//! Source diversity for factual tasks.

use std::collections::{BTreeSet, HashMap};

use waypoint_core::models::{ContextRef, RagChunk, TaskKind};

use super::Findings;

/// Warn when a factual task's references all resolve to one source. Doc
/// references resolve to their document, web references to their host.
/// Unresolvable doc references are ignored here.
pub fn check(task: TaskKind, refs: &[ContextRef], available: &[RagChunk]) -> Findings {
    let mut findings = Findings::default();
    if !task.is_factual() || refs.is_empty() {
        return findings;
    }

    let docs: HashMap<&str, &str> = available
        .iter()
        .map(|c| (c.id.as_str(), c.doc_id.as_str()))
        .collect();
    let sources: BTreeSet<String> = refs
        .iter()
        .filter_map(|r| match r {
            ContextRef::Doc { id, .. } => docs.get(id.as_str()).map(|d| format!("doc:{d}")),
            ContextRef::Web { id, .. } => Some(format!("web:{}", host(id))),
        })
        .collect();

    if let (1, Some(only)) = (sources.len(), sources.first()) {
        findings.warn(format!(
            "all context refs resolve to a single source ({only}); {task} tasks should cross-check"
        ));
    }
    findings
}

/// Lowercased host of a URL without `www.`; the input itself when it has no
/// scheme.
pub(crate) fn host(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = authority.split(':').next().unwrap_or(authority).to_ascii_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}
