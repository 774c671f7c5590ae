//! Citation integrity: every `doc` reference must name a chunk retrieved
//! for this request.

use std::collections::HashMap;

use waypoint_core::models::RagChunk;

use super::Findings;

/// A `doc` reference by position in `context_refs`.
#[derive(Debug, Clone, Copy)]
pub struct DocCitation<'a> {
    pub index: usize,
    pub id: &'a str,
}

/// Unknown ids are errors. Known chunks with blank text are warnings, since
/// the source may have changed after retrieval.
pub fn check<'a>(citations: impl IntoIterator<Item = DocCitation<'a>>, available: &[RagChunk]) -> Findings {
    let by_id: HashMap<&str, &RagChunk> = available.iter().map(|c| (c.id.as_str(), c)).collect();
    let mut findings = Findings::default();

    for citation in citations {
        match by_id.get(citation.id) {
            None => findings.error(format!(
                "context_refs[{}] cites chunk '{}' which was not retrieved",
                citation.index, citation.id
            )),
            Some(chunk) if chunk.text.trim().is_empty() => findings.warn(format!(
                "context_refs[{}] cites chunk '{}' with empty text; it may be stale",
                citation.index, citation.id
            )),
            Some(_) => {}
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, text: &str) -> RagChunk {
        RagChunk {
            id: id.into(),
            doc_id: "d".into(),
            anchor: String::new(),
            text: text.into(),
            score: 0.5,
            headings: vec![],
            updated_at: None,
            tokens: 3,
        }
    }

    #[test]
    fn unknown_id_is_named_in_error() {
        let f = check(
            [
                DocCitation { index: 0, id: "a" },
                DocCitation { index: 1, id: "ghost" },
            ],
            &[chunk("a", "Alpha.")],
        );
        assert_eq!(f.errors.len(), 1);
        assert!(f.errors[0].contains("'ghost'"));
    }

    #[test]
    fn blank_text_only_warns() {
        let f = check([DocCitation { index: 0, id: "a" }], &[chunk("a", "  ")]);
        assert!(f.passed());
        assert_eq!(f.warnings.len(), 1);
    }

    #[test]
    fn no_citations_pass() {
        assert!(check([], &[]).passed());
    }
}
