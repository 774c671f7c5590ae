//! Task selection from a routed classification.

use std::sync::LazyLock;

use regex::Regex;
use waypoint_core::intent::{Intent, IntentClassification, OutputKind};
use waypoint_core::models::TaskKind;

static RE_FACT_CHECK: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(fact[- ]?check|is it true|is that true|verify (that|whether|if)|true or false|debunk)\b").ok()
});

/// The task for a classification. Grounded intents are refined to
/// `fact_check` when the query asks for verification, or `summarize` when
/// the slots ask for a summary.
pub fn select_task(classification: &IntentClassification, query: &str) -> TaskKind {
    let base = TaskKind::for_intent(classification.intent);
    if !matches!(classification.intent, Intent::RagQuery | Intent::WebSearch) {
        return base;
    }
    let fact_check = RE_FACT_CHECK.as_ref().is_some_and(|re| re.is_match(query));
    if fact_check {
        TaskKind::FactCheck
    } else if classification.slots.outputs == OutputKind::Summary {
        TaskKind::Summarize
    } else {
        base
    }
}
