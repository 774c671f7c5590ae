use proptest::prelude::*;
use waypoint_core::models::{RagChunk, TaskKind};
use waypoint_retrieval::{confidence, coverage, pack};

fn make_chunk(i: usize, doc: usize, tokens: usize, score: f64, words: usize) -> RagChunk {
    RagChunk {
        id: format!("c{i}"),
        doc_id: format!("d{doc}"),
        anchor: format!("#p{i}"),
        text: "Lorem ipsum dolor sit amet. ".repeat(words.max(1)),
        score,
        headings: vec![],
        updated_at: None,
        tokens,
    }
}

fn arb_chunks() -> impl Strategy<Value = Vec<RagChunk>> {
    prop::collection::vec((0usize..4, 0usize..800, 0.0f64..=1.0, 1usize..40), 0..12).prop_map(|v| {
        v.into_iter()
            .enumerate()
            .map(|(i, (doc, tokens, score, words))| make_chunk(i, doc, tokens, score, words))
            .collect()
    })
}

fn arb_task() -> impl Strategy<Value = TaskKind> {
    prop::sample::select(TaskKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn packed_tokens_never_exceed_budget(chunks in arb_chunks(), budget in 0usize..2_000) {
        let packed = pack(&chunks, budget);
        prop_assert!(packed.tokens_used <= budget);
        prop_assert_eq!(packed.tokens_used, packed.chunks.iter().map(|c| c.tokens).sum::<usize>());
    }

    #[test]
    fn at_most_one_chunk_is_truncated(chunks in arb_chunks(), budget in 0usize..2_000) {
        let packed = pack(&chunks, budget);
        let changed = packed
            .chunks
            .iter()
            .filter(|p| chunks.iter().any(|c| c.id == p.id && c.text != p.text))
            .count();
        prop_assert!(changed <= 1);
        if let Some(id) = &packed.truncated {
            prop_assert_eq!(&packed.chunks.last().unwrap().id, id);
        }
    }

    #[test]
    fn packed_order_is_score_descending(chunks in arb_chunks(), budget in 0usize..2_000) {
        let packed = pack(&chunks, budget);
        prop_assert!(packed.chunks.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn confidence_is_bounded(chunks in arb_chunks()) {
        let c = confidence(&chunks);
        prop_assert!((0.0..=1.0).contains(&c));
        if chunks.is_empty() {
            prop_assert_eq!(c, 0.0);
        }
    }

    #[test]
    fn confidence_monotone_in_each_score(
        chunks in arb_chunks().prop_filter("non-empty", |c| !c.is_empty()),
        pick in any::<prop::sample::Index>(),
        bump in 0.0f64..1.0,
    ) {
        let i = pick.index(chunks.len());
        let mut raised = chunks.clone();
        raised[i].score = (raised[i].score + bump).min(1.0);
        prop_assert!(confidence(&raised) + 1e-12 >= confidence(&chunks));
    }

    #[test]
    fn coverage_is_bounded(chunks in arb_chunks(), web in 0usize..20, task in arb_task()) {
        let value = coverage(&chunks, web, task);
        prop_assert!((0.0..=1.0).contains(&value));
        if task.allows_low_coverage() && (!chunks.is_empty() || web > 0) {
            prop_assert!(value >= 0.3);
        }
    }
}
