//! InstructionVerifier: runs every dimension and aggregates the findings.

use serde_json::Value;
use waypoint_core::config::VerifierConfig;
use waypoint_core::models::{ContextRef, Instruction, RagChunk, TaskKind, VerificationResult};
use waypoint_observability::tracing_setup::events;
use waypoint_observability::verification_span;

use crate::dimensions::citation::DocCitation;
use crate::dimensions::coverage::CoverageCheck;
use crate::dimensions::{citation, coverage, diversity, schema, Findings};

/// Verifies instructions against the chunks retrieved for the same request.
#[derive(Debug, Clone, Default)]
pub struct InstructionVerifier {
    config: VerifierConfig,
}

impl InstructionVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn verify(&self, instruction: &Instruction, available: &[RagChunk]) -> VerificationResult {
        let _span = verification_span!(instruction.task).entered();

        let structural = schema::check_instruction(instruction);
        let citations = citation::check(doc_citations(&instruction.context_refs), available);
        let coverage =
            coverage::check(instruction.task, instruction.telemetry.coverage, &self.config);
        let diversity = diversity::check(instruction.task, &instruction.context_refs, available);

        self.aggregate(Some(instruction.task), structural, citations, Some(coverage), diversity)
    }

    /// Verify an untyped instruction. Shape errors are reported alongside
    /// whatever citation and coverage findings the parseable parts allow.
    pub fn verify_value(&self, value: &Value, available: &[RagChunk]) -> VerificationResult {
        let mut structural = schema::check_value(value);
        if structural.passed() {
            match serde_json::from_value::<Instruction>(value.clone()) {
                Ok(instruction) => return self.verify(&instruction, available),
                Err(e) => structural.error(format!("instruction does not match the schema: {e}")),
            }
        }

        let task = value
            .get("task")
            .and_then(Value::as_str)
            .and_then(schema::parse_task);
        let _span = verification_span!(task.map_or("unknown", TaskKind::as_str)).entered();

        let refs: Vec<(usize, ContextRef)> = value
            .get("context_refs")
            .and_then(Value::as_array)
            .map(|refs| {
                refs.iter()
                    .enumerate()
                    .filter_map(|(i, r)| {
                        serde_json::from_value::<ContextRef>(r.clone()).ok().map(|r| (i, r))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let citations = citation::check(
            refs.iter().filter(|(_, r)| r.is_doc()).map(|(index, r)| DocCitation {
                index: *index,
                id: r.id(),
            }),
            available,
        );

        let reported_coverage = value
            .get("telemetry")
            .and_then(|t| t.get("coverage"))
            .and_then(Value::as_f64);
        let coverage = task
            .zip(reported_coverage)
            .map(|(task, c)| coverage::check(task, c, &self.config));

        let typed_refs: Vec<ContextRef> = refs.into_iter().map(|(_, r)| r).collect();
        let diversity = task
            .map(|task| diversity::check(task, &typed_refs, available))
            .unwrap_or_default();

        self.aggregate(task, structural, citations, coverage, diversity)
    }

    fn aggregate(
        &self,
        task: Option<TaskKind>,
        structural: Findings,
        citations: Findings,
        coverage: Option<CoverageCheck>,
        diversity: Findings,
    ) -> VerificationResult {
        let structural_ok = structural.passed();
        let citations_valid = citations.passed();
        let coverage_adequate = coverage.as_ref().is_some_and(|c| c.adequate);
        let writing = task.is_some_and(TaskKind::allows_low_coverage);
        let is_valid = structural_ok
            && citations_valid
            && (coverage_adequate || !self.config.require_coverage || writing);

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let coverage_findings = coverage.map(|c| c.findings).unwrap_or_default();
        for findings in [structural, citations, coverage_findings, diversity] {
            errors.extend(findings.errors);
            warnings.extend(findings.warnings);
        }

        events::instruction_verified(
            task.map_or("unknown", TaskKind::as_str),
            is_valid,
            errors.len(),
            warnings.len(),
        );

        VerificationResult {
            is_valid,
            errors,
            warnings,
            citations_valid,
            coverage_adequate,
        }
    }
}

/// Verify with an explicit config.
pub fn verify(
    instruction: &Instruction,
    available: &[RagChunk],
    config: &VerifierConfig,
) -> VerificationResult {
    InstructionVerifier::new(config.clone()).verify(instruction, available)
}

/// Verify an untyped instruction with an explicit config.
pub fn verify_value(value: &Value, available: &[RagChunk], config: &VerifierConfig) -> VerificationResult {
    InstructionVerifier::new(config.clone()).verify_value(value, available)
}

fn doc_citations(refs: &[ContextRef]) -> impl Iterator<Item = DocCitation<'_>> {
    refs.iter()
        .enumerate()
        .filter(|(_, r)| r.is_doc())
        .map(|(index, r)| DocCitation { index, id: r.id() })
}
