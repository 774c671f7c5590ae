//! Turns a routed request and its evidence into an `Instruction`.

use waypoint_core::constants::MAX_INSTRUCTION_TOKENS;
use waypoint_core::intent::OutputKind;
use waypoint_core::models::{
    ContextRef, Instruction, InstructionInputs, OutputFormat, Policies, RagChunk, RouterResponse,
    TaskKind, Telemetry, WebResult,
};

use crate::evidence::Evidence;

/// Builds instructions with a fixed answer budget.
#[derive(Debug, Clone)]
pub struct InstructionBuilder {
    max_tokens: usize,
}

impl InstructionBuilder {
    /// `max_tokens` is clamped to `1..=MAX_INSTRUCTION_TOKENS`.
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens: max_tokens.clamp(1, MAX_INSTRUCTION_TOKENS),
        }
    }

    pub fn build(
        &self,
        response: &RouterResponse,
        inputs: InstructionInputs,
        evidence: &Evidence,
    ) -> Instruction {
        let task = evidence.task;
        let mut context_refs: Vec<ContextRef> = evidence
            .chunks
            .iter()
            .enumerate()
            .map(|(rank, chunk)| doc_ref(rank, chunk, evidence.truncated.as_deref()))
            .collect();
        context_refs.extend(evidence.web_results.iter().map(web_ref));

        let policies = Policies {
            cite_every_claim: task.requires_evidence() && !context_refs.is_empty(),
            no_external_sources: task == TaskKind::RagAnswer,
            max_tokens: self.max_tokens,
            format: format_for(task, response.classification.slots.outputs),
        };

        let telemetry = Telemetry {
            route_conf: response.classification.confidence,
            rag_conf: evidence.confidence,
            coverage: evidence.coverage,
            total_tokens: evidence.tokens_used,
        };

        Instruction {
            task,
            inputs,
            context_refs,
            policies,
            telemetry,
        }
    }
}

fn format_for(task: TaskKind, outputs: OutputKind) -> OutputFormat {
    match (task, outputs) {
        (TaskKind::Edit, OutputKind::Patch) => OutputFormat::Patch,
        (TaskKind::Edit, _) => OutputFormat::Diff,
        _ => OutputFormat::Markdown,
    }
}

fn doc_ref(rank: usize, chunk: &RagChunk, truncated: Option<&str>) -> ContextRef {
    let mut why = if rank == 0 {
        format!("best match in {}", chunk.doc_id)
    } else if let Some(heading) = chunk.headings.last() {
        format!("section \"{heading}\" of {}", chunk.doc_id)
    } else {
        format!("related passage in {}", chunk.doc_id)
    };
    if truncated == Some(chunk.id.as_str()) {
        why.push_str(" (truncated)");
    }

    ContextRef::Doc {
        id: chunk.id.clone(),
        anchor: (!chunk.anchor.is_empty()).then(|| chunk.anchor.clone()),
        why,
        score: Some(chunk.score),
    }
}

fn web_ref(result: &WebResult) -> ContextRef {
    let why = if result.title.trim().is_empty() {
        "web result".to_string()
    } else {
        format!("web result: {}", result.title.trim())
    };
    ContextRef::Web {
        id: result.url.clone(),
        why,
        score: Some(result.score),
    }
}
