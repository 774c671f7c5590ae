//! Built-in labeled examples covering every intent.
//!
//! Phrasings are chosen so that intent-specific vocabulary stays within its
//! intent: "what is" only appears in `ask`, recency words only in
//! `web_search`, edit verbs only in `edit_request`.

use waypoint_core::intent::Intent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedExample {
    pub query: &'static str,
    pub intent: Intent,
    pub confidence: f64,
}

const fn seed(query: &'static str, intent: Intent) -> SeedExample {
    SeedExample {
        query,
        intent,
        confidence: 1.0,
    }
}

const SEEDS: &[SeedExample] = &[
    // ask
    seed("What is deep learning?", Intent::Ask),
    seed("What is reinforcement learning?", Intent::Ask),
    seed("What is supervised learning?", Intent::Ask),
    seed("What is transfer learning in AI?", Intent::Ask),
    seed("What is machine translation?", Intent::Ask),
    seed("How does machine learning work?", Intent::Ask),
    seed("Explain machine learning in simple terms", Intent::Ask),
    seed("What is a neural network?", Intent::Ask),
    seed("What is photosynthesis?", Intent::Ask),
    seed("What is quantum computing?", Intent::Ask),
    seed("What is a black hole?", Intent::Ask),
    seed("What is inflation in economics?", Intent::Ask),
    seed("What is the difference between TCP and UDP?", Intent::Ask),
    seed("How do vaccines work?", Intent::Ask),
    seed("Why is the sky blue?", Intent::Ask),
    seed("Explain the theory of relativity", Intent::Ask),
    seed("Define entropy in physics", Intent::Ask),
    seed("How does a compiler work?", Intent::Ask),
    // web_search
    seed("Latest news about Apple", Intent::WebSearch),
    seed("Latest news about the stock market", Intent::WebSearch),
    seed("What's the latest news on the election?", Intent::WebSearch),
    seed("What's happening in the news today?", Intent::WebSearch),
    seed("Recent news about SpaceX launches", Intent::WebSearch),
    seed("Breaking news about the earthquake", Intent::WebSearch),
    seed("Latest updates about climate policy", Intent::WebSearch),
    seed("News about Microsoft this week", Intent::WebSearch),
    seed("Latest iPhone release news", Intent::WebSearch),
    seed("Today's top headlines", Intent::WebSearch),
    seed("Current weather in London", Intent::WebSearch),
    seed("Bitcoin price right now", Intent::WebSearch),
    seed("Current exchange rate for euro to dollar", Intent::WebSearch),
    seed("Who won the game last night?", Intent::WebSearch),
    seed("What's trending on social media today?", Intent::WebSearch),
    seed("Search the web for flight prices to Tokyo", Intent::WebSearch),
    // rag_query
    seed("Summarize my uploaded report", Intent::RagQuery),
    seed("According to my notes, when does the project start?", Intent::RagQuery),
    seed("Find the budget figures in the attached spreadsheet", Intent::RagQuery),
    seed("Show revenue numbers from my document", Intent::RagQuery),
    seed("Search my files for the onboarding checklist", Intent::RagQuery),
    seed("In the attached PDF, who signed the agreement?", Intent::RagQuery),
    seed("Quote the conclusion from my thesis document", Intent::RagQuery),
    seed("Based on my documents, list our vendors", Intent::RagQuery),
    seed("Which of my uploaded papers cites Smith?", Intent::RagQuery),
    seed("Pull the key dates from the meeting notes I shared", Intent::RagQuery),
    seed("Compare the two contracts I attached", Intent::RagQuery),
    seed("Look up the refund policy in our handbook", Intent::RagQuery),
    // edit_request
    seed("Rewrite this paragraph to sound more formal", Intent::EditRequest),
    seed("Fix the grammar in this sentence", Intent::EditRequest),
    seed("Make this shorter", Intent::EditRequest),
    seed("Rephrase the selected text", Intent::EditRequest),
    seed("Proofread my introduction", Intent::EditRequest),
    seed("Change the tone of this email to be friendlier", Intent::EditRequest),
    seed("Simplify this explanation", Intent::EditRequest),
    seed("Correct the spelling mistakes here", Intent::EditRequest),
    seed("Translate this paragraph into Spanish", Intent::EditRequest),
    seed("Edit this section for clarity", Intent::EditRequest),
    seed("Shorten the conclusion to two sentences", Intent::EditRequest),
    seed("Replace passive voice in this paragraph", Intent::EditRequest),
    // editor_write
    seed("Write an essay on climate change", Intent::EditorWrite),
    seed("Draft an email to my manager asking for leave", Intent::EditorWrite),
    seed("Compose a blog post on remote work", Intent::EditorWrite),
    seed("Write a cover letter for a software engineer job", Intent::EditorWrite),
    seed("Create a product description for wireless earbuds", Intent::EditorWrite),
    seed("Generate a short story set on Mars", Intent::EditorWrite),
    seed("Write a poem on autumn leaves", Intent::EditorWrite),
    seed("Draft a project proposal for a new mobile app", Intent::EditorWrite),
    seed("Write a LinkedIn post announcing my promotion", Intent::EditorWrite),
    seed("Create an outline for a presentation on cybersecurity", Intent::EditorWrite),
    seed("Write a thank-you note to a colleague", Intent::EditorWrite),
    seed("Draft meeting minutes from these bullet points", Intent::EditorWrite),
    // other
    seed("Hello", Intent::Other),
    seed("Hi there, how are you?", Intent::Other),
    seed("Thanks a lot!", Intent::Other),
    seed("Good morning", Intent::Other),
    seed("Tell me a joke", Intent::Other),
    seed("Who are you?", Intent::Other),
    seed("Goodbye", Intent::Other),
    seed("Can you help me?", Intent::Other),
    seed("Nice to meet you", Intent::Other),
    seed("That was helpful, thank you", Intent::Other),
];

/// The built-in seed set.
pub fn seed_examples() -> &'static [SeedExample] {
    SEEDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_intent_is_seeded() {
        for intent in Intent::ALL {
            let n = seed_examples().iter().filter(|s| s.intent == intent).count();
            assert!(n >= 10, "{intent} has only {n} seeds");
        }
    }

    #[test]
    fn what_is_only_seeds_ask() {
        for s in seed_examples() {
            if s.query.to_lowercase().starts_with("what is") {
                assert_eq!(s.intent, Intent::Ask, "{}", s.query);
            }
        }
    }
}
