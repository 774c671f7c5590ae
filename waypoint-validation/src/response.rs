//! Answer-side citation validation.
//!
//! Markers are 1-based indices into `instruction.context_refs`, written as
//! `[n]` or grouped as `[n, m]`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use waypoint_core::models::{Instruction, ResponseValidation};

static RE_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\[(\d+(?:\s*,\s*\d+)*)\]").ok());

/// Check the citation markers in a generated answer.
///
/// Every marker must resolve to a context ref. When the instruction asks
/// for every claim to be cited, the answer must also carry at least one
/// marker. Violations are reported as errors.
pub fn validate_response(answer: &str, instruction: &Instruction) -> ResponseValidation {
    let ref_count = instruction.context_refs.len();
    let mut errors = Vec::new();
    let mut markers = Vec::new();
    let mut unparseable = false;

    if let Some(re) = RE_MARKER.as_ref() {
        for caps in re.captures_iter(answer) {
            for raw in caps[1].split(',') {
                match raw.trim().parse::<usize>() {
                    Ok(n) if !markers.contains(&n) => markers.push(n),
                    Ok(_) => {}
                    Err(_) => unparseable = true,
                }
            }
        }
    }

    if instruction.policies.cite_every_claim && markers.is_empty() && !unparseable {
        errors.push("answer contains no citation markers".to_string());
    }

    let dangling: BTreeSet<usize> = markers
        .iter()
        .copied()
        .filter(|n| *n == 0 || *n > ref_count)
        .collect();
    for n in dangling {
        errors.push(format!(
            "citation [{n}] does not match any of the {ref_count} context refs"
        ));
    }
    if unparseable {
        errors.push("citation marker index is out of range".to_string());
    }

    ResponseValidation {
        is_valid: errors.is_empty(),
        errors,
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::models::{
        ContextRef, InstructionInputs, OutputFormat, Policies, TaskKind, Telemetry,
    };

    fn instruction(refs: usize, cite_every_claim: bool) -> Instruction {
        Instruction {
            task: TaskKind::RagAnswer,
            inputs: InstructionInputs {
                query: "q".into(),
                ..Default::default()
            },
            context_refs: (0..refs)
                .map(|i| ContextRef::Doc {
                    id: format!("c{i}"),
                    anchor: None,
                    why: "w".into(),
                    score: None,
                })
                .collect(),
            policies: Policies {
                cite_every_claim,
                no_external_sources: true,
                max_tokens: 256,
                format: OutputFormat::Markdown,
            },
            telemetry: Telemetry::default(),
        }
    }

    #[test]
    fn valid_markers_pass() {
        let v = validate_response("Rust is safe [1]. It is fast [2][1].", &instruction(2, true));
        assert!(v.is_valid, "{:?}", v.errors);
        assert_eq!(v.markers, [1, 2]);
    }

    #[test]
    fn grouped_markers_are_split() {
        let v = validate_response("Both agree [1, 3].", &instruction(3, true));
        assert!(v.is_valid);
        assert_eq!(v.markers, [1, 3]);
    }

    #[test]
    fn missing_markers_fail_only_when_required() {
        assert!(!validate_response("No sources here.", &instruction(2, true)).is_valid);
        assert!(validate_response("No sources here.", &instruction(2, false)).is_valid);
    }

    #[test]
    fn out_of_range_markers_fail() {
        let v = validate_response("See [0] and [4] and [4].", &instruction(3, false));
        assert!(!v.is_valid);
        assert_eq!(v.errors.len(), 2);
        assert!(v.errors[1].contains("[4]"));
    }

    #[test]
    fn huge_index_is_an_error_not_a_panic() {
        let v = validate_response("[99999999999999999999999]", &instruction(1, true));
        assert!(!v.is_valid);
    }
}
