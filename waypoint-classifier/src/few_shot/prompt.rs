//! Dynamic prompt assembly for the few-shot tier.

use std::fmt::Write;

use waypoint_core::intent::Intent;
use waypoint_core::models::RouterContext;
use waypoint_core::traits::ChatMessage;
use waypoint_embeddings::SimilarExample;

/// System message: the taxonomy and the reply schema.
pub fn system_message() -> ChatMessage {
    let mut text = String::from(
        "Classify the user's request into exactly one intent.\n\nIntents:\n",
    );
    for intent in Intent::ALL {
        let _ = writeln!(text, "- {}: {}", intent.as_str(), intent.description());
    }
    text.push_str(
        "\nReply with a single JSON object and nothing else:\n\
         {\"intent\": \"<intent>\", \"confidence\": <0..1>, \
         \"slots\": {\"topic\": \"...\", \"needs_recency\": false, \"target_docs\": [], \
         \"edit_target\": \"selection|file|section\", \
         \"outputs\": \"answer|links|summary|diff|patch\"}, \
         \"reasoning\": \"<one sentence>\"}\n",
    );
    ChatMessage::system(text)
}

/// User message: nearest labeled examples, context flags and the query.
pub fn user_message(query: &str, examples: &[SimilarExample], context: &RouterContext) -> ChatMessage {
    let mut text = String::new();
    if !examples.is_empty() {
        text.push_str("Labeled examples:\n");
        for ex in examples {
            let _ = writeln!(
                text,
                "Query: {}\nIntent: {}\n",
                ex.metadata.query.trim(),
                ex.metadata.intent
            );
        }
    }

    let flags = context_flags(context);
    if !flags.is_empty() {
        let _ = writeln!(text, "Context: {}\n", flags.join(", "));
    }

    let _ = write!(text, "Query: {}\nIntent:", query.trim());
    ChatMessage::user(text)
}

fn context_flags(context: &RouterContext) -> Vec<String> {
    let mut flags = Vec::new();
    if context.has_attached_docs {
        flags.push(format!("{} attached document(s)", context.doc_ids.len().max(1)));
    }
    if context.has_selection {
        flags.push(format!("{} characters selected", context.selection_length));
    }
    if !context.recent_tools.is_empty() {
        flags.push(format!("recent tools: {}", context.recent_tools.join(" ")));
    }
    if context.conversation_length > 0 {
        flags.push(format!("{} prior turns", context.conversation_length));
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::models::ExampleSource;
    use waypoint_core::traits::ChatRole;
    use waypoint_embeddings::ExampleMetadata;

    #[test]
    fn system_lists_every_intent() {
        let msg = system_message();
        assert_eq!(msg.role, ChatRole::System);
        for intent in Intent::ALL {
            assert!(msg.content.contains(intent.as_str()));
        }
    }

    #[test]
    fn user_message_includes_examples_and_flags() {
        let examples = vec![SimilarExample {
            id: "1".into(),
            similarity: 0.9,
            metadata: ExampleMetadata {
                query: "latest news on rust".into(),
                intent: Intent::WebSearch,
                confidence: 1.0,
                source: ExampleSource::Seed,
            },
        }];
        let context = RouterContext {
            has_selection: true,
            selection_length: 42,
            ..Default::default()
        };
        let msg = user_message("what happened today?", &examples, &context);
        assert_eq!(msg.role, ChatRole::User);
        assert!(msg.content.contains("Intent: web_search"));
        assert!(msg.content.contains("42 characters selected"));
        assert!(msg.content.ends_with("Query: what happened today?\nIntent:"));
    }

    #[test]
    fn no_examples_no_context() {
        let msg = user_message("hi", &[], &RouterContext::default());
        assert_eq!(msg.content, "Query: hi\nIntent:");
    }
}
