use proptest::prelude::*;
use waypoint_core::config::VerifierConfig;
use waypoint_core::models::{
    ContextRef, Instruction, InstructionInputs, OutputFormat, Policies, RagChunk, TaskKind,
    Telemetry,
};
use waypoint_validation::verify;

fn make_chunk(i: usize, text: String) -> RagChunk {
    RagChunk {
        id: format!("chunk-{i}"),
        doc_id: format!("doc-{}", i % 3),
        anchor: format!("#p{i}"),
        text,
        score: 0.5,
        headings: vec![],
        updated_at: None,
        tokens: 8,
    }
}

fn make_instruction(task: TaskKind, cited: &[usize], coverage: f64) -> Instruction {
    Instruction {
        task,
        inputs: InstructionInputs {
            query: "query".into(),
            ..Default::default()
        },
        context_refs: cited
            .iter()
            .map(|i| ContextRef::Doc {
                id: format!("chunk-{i}"),
                anchor: None,
                why: "cited".into(),
                score: Some(0.5),
            })
            .collect(),
        policies: Policies {
            cite_every_claim: true,
            no_external_sources: false,
            max_tokens: 512,
            format: OutputFormat::Markdown,
        },
        telemetry: Telemetry {
            route_conf: 0.8,
            rag_conf: 0.5,
            coverage,
            total_tokens: 8 * cited.len(),
        },
    }
}

fn arb_task() -> impl Strategy<Value = TaskKind> {
    prop::sample::select(TaskKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn citations_valid_when_every_ref_is_retrieved(
        texts in prop::collection::vec("[a-z]{1,12}( [a-z]{1,12}){0,5}", 1..10),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
        task in arb_task(),
        coverage in 0.0f64..=1.0,
    ) {
        let chunks: Vec<RagChunk> = texts.into_iter().enumerate().map(|(i, t)| make_chunk(i, t)).collect();
        let cited: Vec<usize> = picks.iter().map(|p| p.index(chunks.len())).collect();
        let instruction = make_instruction(task, &cited, coverage);

        let result = verify(&instruction, &chunks, &VerifierConfig::default());
        prop_assert!(result.citations_valid, "{:?}", result.errors);
    }

    #[test]
    fn any_unknown_ref_invalidates(
        count in 1usize..8,
        stray in 100usize..200,
        task in arb_task(),
    ) {
        let chunks: Vec<RagChunk> = (0..count).map(|i| make_chunk(i, "text".into())).collect();
        let instruction = make_instruction(task, &[0, stray], 1.0);

        let result = verify(&instruction, &chunks, &VerifierConfig::default());
        prop_assert!(!result.citations_valid);
        prop_assert!(!result.is_valid);
        let expected = format!("chunk-{stray}");
        prop_assert!(result.errors.iter().any(|e| e.contains(&expected)));
    }
}
