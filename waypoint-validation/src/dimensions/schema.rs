//! Structural validation: required fields, enum membership, numeric ranges.
//!
//! `check_value` validates untyped JSON against the instruction shape;
//! `check_instruction` validates the ranges a typed instruction can still
//! violate.

use std::collections::HashSet;

use serde_json::{Map, Value};
use waypoint_core::constants::MAX_INSTRUCTION_TOKENS;
use waypoint_core::models::{ContextRef, Instruction, TaskKind};

use super::Findings;

const FORMATS: [&str; 4] = ["markdown", "plain", "diff", "patch"];
const REF_TYPES: [&str; 2] = ["doc", "web"];

/// Range checks on a typed instruction.
pub fn check_instruction(instruction: &Instruction) -> Findings {
    let mut findings = Findings::default();

    if instruction.inputs.query.trim().is_empty() {
        findings.error("inputs.query must not be empty");
    }

    let max_tokens = instruction.policies.max_tokens;
    if max_tokens == 0 || max_tokens > MAX_INSTRUCTION_TOKENS {
        findings.error(format!(
            "policies.max_tokens must be within 1..={MAX_INSTRUCTION_TOKENS}, got {max_tokens}"
        ));
    }

    let t = &instruction.telemetry;
    for (field, value) in [
        ("telemetry.route_conf", t.route_conf),
        ("telemetry.rag_conf", t.rag_conf),
        ("telemetry.coverage", t.coverage),
    ] {
        check_unit(&mut findings, field, value);
    }

    let mut seen = HashSet::new();
    for (i, context_ref) in instruction.context_refs.iter().enumerate() {
        let id = context_ref.id();
        if id.trim().is_empty() {
            findings.error(format!("context_refs[{i}].id must not be empty"));
        } else if !seen.insert(id) {
            findings.warn(format!("context_refs[{i}] duplicates id '{id}'"));
        }
        if let Some(score) = context_ref.score() {
            check_unit(&mut findings, &format!("context_refs[{i}].score"), score);
        }
        if let ContextRef::Web { id, .. } = context_ref {
            if !id.trim().is_empty() && !is_http_url(id) {
                findings.error(format!("context_refs[{i}].id must be an http(s) URL, got '{id}'"));
            }
        }
    }

    findings
}

/// Shape checks on an untyped instruction.
pub fn check_value(value: &Value) -> Findings {
    let mut findings = Findings::default();
    let Some(root) = value.as_object() else {
        findings.error("instruction must be a JSON object");
        return findings;
    };

    match root.get("task") {
        Some(Value::String(task)) if parse_task(task).is_some() => {}
        Some(Value::String(task)) => findings.error(format!("task '{task}' is not a known task")),
        Some(_) => findings.error("task must be a string"),
        None => findings.error("task is required"),
    }

    if let Some(inputs) = object(&mut findings, root, "inputs") {
        if !matches!(inputs.get("query"), Some(Value::String(_))) {
            findings.error("inputs.query must be a string");
        }
    }

    match root.get("context_refs") {
        Some(Value::Array(refs)) => {
            for (i, r) in refs.iter().enumerate() {
                check_ref_value(&mut findings, i, r);
            }
        }
        Some(_) => findings.error("context_refs must be an array"),
        None => findings.error("context_refs is required"),
    }

    if let Some(policies) = object(&mut findings, root, "policies") {
        for flag in ["cite_every_claim", "no_external_sources"] {
            if !matches!(policies.get(flag), Some(Value::Bool(_))) {
                findings.error(format!("policies.{flag} must be a boolean"));
            }
        }
        match policies.get("max_tokens").and_then(Value::as_u64) {
            Some(n) if (1..=MAX_INSTRUCTION_TOKENS as u64).contains(&n) => {}
            _ => findings.error(format!(
                "policies.max_tokens must be an integer within 1..={MAX_INSTRUCTION_TOKENS}"
            )),
        }
        match policies.get("format").and_then(Value::as_str) {
            Some(f) if FORMATS.contains(&f) => {}
            _ => findings.error(format!("policies.format must be one of {}", FORMATS.join(", "))),
        }
    }

    if let Some(telemetry) = object(&mut findings, root, "telemetry") {
        for field in ["route_conf", "rag_conf", "coverage"] {
            match telemetry.get(field).and_then(Value::as_f64) {
                Some(v) => check_unit(&mut findings, &format!("telemetry.{field}"), v),
                None => findings.error(format!("telemetry.{field} must be a number")),
            }
        }
        if telemetry.get("total_tokens").and_then(Value::as_u64).is_none() {
            findings.error("telemetry.total_tokens must be a non-negative integer");
        }
    }

    findings
}

pub(crate) fn parse_task(name: &str) -> Option<TaskKind> {
    TaskKind::ALL.into_iter().find(|t| t.as_str() == name)
}

fn object<'a>(
    findings: &mut Findings,
    root: &'a Map<String, Value>,
    field: &str,
) -> Option<&'a Map<String, Value>> {
    match root.get(field) {
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            findings.error(format!("{field} must be an object"));
            None
        }
        None => {
            findings.error(format!("{field} is required"));
            None
        }
    }
}

fn check_ref_value(findings: &mut Findings, i: usize, value: &Value) {
    let Some(r) = value.as_object() else {
        findings.error(format!("context_refs[{i}] must be an object"));
        return;
    };
    match r.get("type").and_then(Value::as_str) {
        Some(t) if REF_TYPES.contains(&t) => {}
        Some(t) => findings.error(format!("context_refs[{i}].type '{t}' must be doc or web")),
        None => findings.error(format!("context_refs[{i}].type is required")),
    }
    match r.get("id").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => {}
        _ => findings.error(format!("context_refs[{i}].id must be a non-empty string")),
    }
    if !matches!(r.get("why"), Some(Value::String(_))) {
        findings.error(format!("context_refs[{i}].why must be a string"));
    }
    match r.get("score") {
        None | Some(Value::Null) => {}
        Some(v) => match v.as_f64() {
            Some(score) => check_unit(findings, &format!("context_refs[{i}].score"), score),
            None => findings.error(format!("context_refs[{i}].score must be a number")),
        },
    }
}

fn check_unit(findings: &mut Findings, field: &str, value: f64) {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        findings.error(format!("{field} must be within [0, 1], got {value}"));
    }
}

fn is_http_url(id: &str) -> bool {
    let lower = id.trim().to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()))
}
