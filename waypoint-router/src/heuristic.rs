//! Keyword heuristic used as the low-confidence third tier.

use waypoint_core::intent::Intent;
use waypoint_core::models::RouterContext;

use crate::patterns::{matches, RE_DOC_REFERENCE, RE_EDIT, RE_RECENCY, RE_WRITE};

/// First matching rule wins: recency words, edit verbs, writing verbs,
/// document references or attached docs, else `ask`.
pub fn heuristic_intent(query: &str, context: &RouterContext) -> Intent {
    if matches(&RE_RECENCY, query) {
        Intent::WebSearch
    } else if matches(&RE_EDIT, query) {
        Intent::EditRequest
    } else if matches(&RE_WRITE, query) {
        Intent::EditorWrite
    } else if context.has_attached_docs || matches(&RE_DOC_REFERENCE, query) {
        Intent::RagQuery
    } else {
        Intent::Ask
    }
}
