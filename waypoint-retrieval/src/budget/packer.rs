//! Greedy score-ordered packing into a token budget.
//!
//! Candidates are accepted whole while they fit. The first candidate that
//! does not fit is cut down to the remaining budget once, and packing stops
//! there, so the packed set never exceeds the budget.

use serde::{Deserialize, Serialize};
use waypoint_core::constants::TRUNCATION_MARKER;
use waypoint_core::models::RagChunk;
use waypoint_tokens::TokenBudget;

/// Result of packing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackedContext {
    /// Accepted chunks in score order. The last one may be truncated.
    pub chunks: Vec<RagChunk>,
    pub tokens_used: usize,
    /// Id of the chunk cut at the budget boundary, if any.
    pub truncated: Option<String>,
    pub candidates: usize,
}

impl PackedContext {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Pack `candidates` into `budget` tokens.
pub fn pack(candidates: &[RagChunk], budget: usize) -> PackedContext {
    let mut packed = PackedContext {
        candidates: candidates.len(),
        ..Default::default()
    };
    if candidates.is_empty() || budget == 0 {
        return packed;
    }

    let mut ordered: Vec<&RagChunk> = candidates.iter().collect();
    // `sort_by` is stable: equal scores keep input order.
    ordered.sort_by(|a, b| rank_score(b).total_cmp(&rank_score(a)));

    for chunk in ordered {
        let remaining = TokenBudget::remaining(budget, packed.tokens_used);
        if chunk.tokens <= remaining {
            packed.tokens_used += chunk.tokens;
            packed.chunks.push(chunk.clone());
            continue;
        }

        if let Some(cut) = truncate_to_fit(chunk, remaining) {
            packed.tokens_used += cut.tokens;
            packed.truncated = Some(cut.id.clone());
            packed.chunks.push(cut);
        }
        break;
    }

    packed
}

fn rank_score(chunk: &RagChunk) -> f64 {
    if chunk.score.is_nan() {
        0.0
    } else {
        chunk.score
    }
}

/// Shrink `chunk` to at most `remaining` tokens. Cuts at the last sentence
/// end inside the kept prefix when there is one, else hard-cuts and appends
/// the truncation marker. `None` when nothing useful would remain.
pub(crate) fn truncate_to_fit(chunk: &RagChunk, remaining: usize) -> Option<RagChunk> {
    if remaining == 0 || chunk.tokens == 0 {
        return None;
    }

    let total_chars = chunk.text.chars().count();
    if total_chars == 0 {
        return None;
    }
    let keep_chars = total_chars * remaining / chunk.tokens;
    if keep_chars == 0 {
        return None;
    }

    let prefix = char_prefix(&chunk.text, keep_chars);
    let text = match last_sentence_end(prefix) {
        Some(end) => prefix[..end].to_string(),
        None => {
            // Leave room for the marker inside the kept share.
            let body = char_prefix(prefix, keep_chars.saturating_sub(1)).trim_end();
            if body.is_empty() {
                return None;
            }
            format!("{body}{TRUNCATION_MARKER}")
        }
    };

    let kept = text.chars().count();
    let tokens = TokenBudget::scaled(chunk.tokens, kept, total_chars, remaining).max(1);
    if tokens > remaining {
        return None;
    }

    Some(RagChunk {
        text,
        tokens,
        ..chunk.clone()
    })
}

/// The first `n` characters of `text`.
fn char_prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Byte offset just past the last sentence terminator that is followed by
/// whitespace or ends the text.
fn last_sentence_end(text: &str) -> Option<usize> {
    let mut last = None;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if boundary {
                last = Some(idx + c.len_utf8());
            }
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, text: &str, tokens: usize, score: f64) -> RagChunk {
        RagChunk {
            id: id.to_string(),
            doc_id: "doc".to_string(),
            anchor: format!("#{id}"),
            text: text.to_string(),
            score,
            headings: vec![],
            updated_at: None,
            tokens,
        }
    }

    #[test]
    fn empty_or_zero_budget_packs_nothing() {
        assert!(pack(&[], 100).is_empty());
        assert!(pack(&[chunk("a", "text", 5, 0.5)], 0).is_empty());
    }

    #[test]
    fn accepts_in_score_order() {
        let packed = pack(
            &[chunk("low", "low", 10, 0.2), chunk("high", "high", 10, 0.9)],
            100,
        );
        let ids: Vec<_> = packed.chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["high", "low"]);
        assert_eq!(packed.tokens_used, 20);
        assert!(packed.truncated.is_none());
    }

    #[test]
    fn ties_keep_input_order() {
        let packed = pack(
            &[chunk("first", "a", 1, 0.5), chunk("second", "b", 1, 0.5)],
            10,
        );
        assert_eq!(packed.chunks[0].id, "first");
    }

    #[test]
    fn cuts_at_sentence_end() {
        let text = "One short sentence. Another sentence follows here. And a third one.";
        let cut = truncate_to_fit(&chunk("c", text, 70, 0.5), 40).unwrap();
        assert_eq!(cut.text, "One short sentence.");
        assert!(cut.tokens <= 40);
    }

    #[test]
    fn hard_cut_appends_marker() {
        let text = "a".repeat(100);
        let cut = truncate_to_fit(&chunk("c", &text, 100, 0.5), 30).unwrap();
        assert!(cut.text.ends_with(TRUNCATION_MARKER));
        assert!(cut.tokens <= 30);
    }

    #[test]
    fn multibyte_text_is_cut_on_char_boundaries() {
        let text = "日本語のテキスト".repeat(10);
        let cut = truncate_to_fit(&chunk("c", &text, 80, 0.5), 10).unwrap();
        assert!(cut.text.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn stops_after_one_truncation() {
        let packed = pack(
            &[
                chunk("a", &"x".repeat(80), 80, 0.9),
                chunk("b", &"y".repeat(50), 50, 0.8),
                chunk("c", "z", 1, 0.1),
            ],
            100,
        );
        assert_eq!(packed.chunks.len(), 2);
        assert_eq!(packed.truncated.as_deref(), Some("b"));
        assert!(packed.tokens_used <= 100);
    }

    #[test]
    fn sentence_end_requires_boundary() {
        assert_eq!(last_sentence_end("v1.2 is out"), None);
        assert_eq!(last_sentence_end("Done. Next"), Some(5));
        assert_eq!(last_sentence_end("Really?"), Some(7));
    }
}
