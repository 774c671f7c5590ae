use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The closed set of handling strategies a query can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Answer from general knowledge.
    Ask,
    /// Live web lookup.
    WebSearch,
    /// Answer from the user's private documents.
    RagQuery,
    /// Modify existing text.
    EditRequest,
    /// Generate new content.
    EditorWrite,
    Other,
}

impl Intent {
    /// Total number of intent types.
    pub const COUNT: usize = 6;

    /// All variants in their fixed order. Ties and the untrained state
    /// resolve to the first entry.
    pub const ALL: [Intent; 6] = [
        Self::Ask,
        Self::WebSearch,
        Self::RagQuery,
        Self::EditRequest,
        Self::EditorWrite,
        Self::Other,
    ];

    /// Position in [`Intent::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Ask => 0,
            Self::WebSearch => 1,
            Self::RagQuery => 2,
            Self::EditRequest => 3,
            Self::EditorWrite => 4,
            Self::Other => 5,
        }
    }

    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::WebSearch => "web_search",
            Self::RagQuery => "rag_query",
            Self::EditRequest => "edit_request",
            Self::EditorWrite => "editor_write",
            Self::Other => "other",
        }
    }

    /// One-line description used when prompting a completion model.
    pub fn description(self) -> &'static str {
        match self {
            Self::Ask => "general question answerable from background knowledge",
            Self::WebSearch => "needs current or live information from the web",
            Self::RagQuery => "about the user's own uploaded or attached documents",
            Self::EditRequest => "change, fix, or rewrite existing text",
            Self::EditorWrite => "compose new content such as an essay, email, or report",
            Self::Other => "greeting, chit-chat, or anything outside the above",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == needle)
            .ok_or_else(|| format!("unknown intent: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (i, intent) in Intent::ALL.iter().enumerate() {
            assert_eq!(intent.index(), i);
        }
    }

    #[test]
    fn parses_wire_names() {
        for intent in Intent::ALL {
            assert_eq!(intent.as_str().parse::<Intent>().unwrap(), intent);
        }
        assert_eq!(" Web_Search ".parse::<Intent>().unwrap(), Intent::WebSearch);
        assert!("search".parse::<Intent>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Intent::EditorWrite).unwrap();
        assert_eq!(json, "\"editor_write\"");
    }
}
