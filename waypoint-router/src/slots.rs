//! Deterministic slot synthesis from the winning intent.

use waypoint_core::intent::{EditTarget, Intent, OutputKind, Slots};
use waypoint_core::models::RouterContext;

use crate::patterns::{matches, RE_LEADING_QUESTION, RE_LINKS, RE_SECTION, RE_SUMMARY};

pub fn synthesize(intent: Intent, query: &str, context: &RouterContext) -> Slots {
    Slots {
        topic: extract_topic(query),
        needs_recency: intent == Intent::WebSearch,
        target_docs: if intent == Intent::RagQuery {
            context.doc_ids.clone()
        } else {
            Vec::new()
        },
        edit_target: edit_target(intent, query, context),
        outputs: outputs(intent, query),
    }
}

fn edit_target(intent: Intent, query: &str, context: &RouterContext) -> Option<EditTarget> {
    match intent {
        Intent::EditRequest | Intent::EditorWrite if context.has_selection => Some(EditTarget::Selection),
        Intent::EditRequest if matches(&RE_SECTION, query) => Some(EditTarget::Section),
        Intent::EditRequest => Some(EditTarget::File),
        _ => None,
    }
}

fn outputs(intent: Intent, query: &str) -> OutputKind {
    match intent {
        Intent::EditRequest => OutputKind::Diff,
        Intent::WebSearch if matches(&RE_LINKS, query) => OutputKind::Links,
        Intent::Ask | Intent::WebSearch | Intent::RagQuery if matches(&RE_SUMMARY, query) => {
            OutputKind::Summary
        }
        _ => OutputKind::Answer,
    }
}

/// The query minus a leading interrogative phrase and trailing punctuation.
pub fn extract_topic(query: &str) -> Option<String> {
    let stripped = match RE_LEADING_QUESTION.as_ref() {
        Some(re) => re.replace(query, "").into_owned(),
        None => query.to_string(),
    };
    let topic = stripped
        .trim()
        .trim_end_matches(|c: char| matches!(c, '?' | '.' | '!'))
        .trim();
    (!topic.is_empty()).then(|| topic.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_search_needs_recency() {
        let slots = synthesize(
            Intent::WebSearch,
            "What's the latest news about Tesla?",
            &RouterContext::default(),
        );
        assert!(slots.needs_recency);
        assert_eq!(slots.topic.as_deref(), Some("the latest news about Tesla"));
        assert_eq!(slots.outputs, OutputKind::Answer);
        assert!(slots.target_docs.is_empty());
    }

    #[test]
    fn rag_takes_context_docs() {
        let context = RouterContext {
            doc_ids: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        let slots = synthesize(Intent::RagQuery, "summarize the report", &context);
        assert_eq!(slots.target_docs, vec!["a", "b"]);
        assert_eq!(slots.outputs, OutputKind::Summary);
        assert!(!slots.needs_recency);

        let other = synthesize(Intent::Ask, "summarize the report", &context);
        assert!(other.target_docs.is_empty());
    }

    #[test]
    fn edit_targets() {
        let selected = RouterContext {
            has_selection: true,
            selection_length: 120,
            ..Default::default()
        };
        let none = RouterContext::default();
        assert_eq!(
            synthesize(Intent::EditRequest, "fix this", &selected).edit_target,
            Some(EditTarget::Selection)
        );
        assert_eq!(
            synthesize(Intent::EditRequest, "tighten the second paragraph", &none).edit_target,
            Some(EditTarget::Section)
        );
        let file = synthesize(Intent::EditRequest, "fix the typos", &none);
        assert_eq!(file.edit_target, Some(EditTarget::File));
        assert_eq!(file.outputs, OutputKind::Diff);
        assert_eq!(synthesize(Intent::Ask, "fix this", &selected).edit_target, None);
    }

    #[test]
    fn links_for_web() {
        let slots = synthesize(Intent::WebSearch, "give me links about rust 2024", &RouterContext::default());
        assert_eq!(slots.outputs, OutputKind::Links);
    }

    #[test]
    fn topic_edge_cases() {
        assert_eq!(extract_topic("?"), None);
        assert_eq!(extract_topic("   "), None);
        assert_eq!(extract_topic("What is machine learning?").as_deref(), Some("machine learning"));
        assert_eq!(extract_topic("hello there").as_deref(), Some("hello there"));
    }
}
