//! Extraction and validation of the JSON object in a completion reply.
//!
//! Models wrap the object in prose or code fences, so the reply is scanned
//! for the first balanced `{...}` that parses, honouring string literals
//! and escapes.

use serde_json::Value;
use waypoint_core::intent::{Intent, Slots};

/// A schema-valid few-shot answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedClassification {
    pub intent: Intent,
    /// Clamped into [0, 1].
    pub confidence: f64,
    pub slots: Slots,
    pub reasoning: Option<String>,
}

/// Why a reply was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("no JSON object in completion")]
    NoJsonObject,

    #[error("missing string field `intent`")]
    MissingIntent,

    #[error("unknown intent `{0}`")]
    UnknownIntent(String),

    #[error("missing numeric field `confidence`")]
    MissingConfidence,

    #[error("invalid slots: {0}")]
    InvalidSlots(String),
}

/// Parse and validate a completion reply.
pub fn parse_reply(reply: &str) -> Result<ParsedClassification, ParseFailure> {
    let value = extract_json_object(reply).ok_or(ParseFailure::NoJsonObject)?;
    validate(&value)
}

/// First balanced object in `text` that parses as JSON.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    let mut start = 0;
    while let Some(offset) = text[start..].find('{') {
        let open = start + offset;
        if let Some(close) = matching_brace(bytes, open) {
            if let Ok(value @ Value::Object(_)) = serde_json::from_str(&text[open..=close]) {
                return Some(value);
            }
        }
        start = open + 1;
    }
    None
}

/// Index of the brace closing the one at `open`, skipping braces inside
/// string literals.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn validate(value: &Value) -> Result<ParsedClassification, ParseFailure> {
    let intent_raw = value
        .get("intent")
        .and_then(Value::as_str)
        .ok_or(ParseFailure::MissingIntent)?;
    let intent = intent_raw
        .parse::<Intent>()
        .map_err(|_| ParseFailure::UnknownIntent(intent_raw.to_string()))?;

    let confidence = value
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .ok_or(ParseFailure::MissingConfidence)?
        .clamp(0.0, 1.0);

    let slots = match value.get("slots") {
        None | Some(Value::Null) => Slots::default(),
        Some(obj @ Value::Object(_)) => serde_json::from_value(obj.clone())
            .map_err(|e| ParseFailure::InvalidSlots(e.to_string()))?,
        Some(other) => {
            return Err(ParseFailure::InvalidSlots(format!("expected object, got {other}")));
        }
    };

    let reasoning = value
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ParsedClassification {
        intent,
        confidence,
        slots,
        reasoning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::intent::EditTarget;

    #[test]
    fn plain_object() {
        let parsed = parse_reply(r#"{"intent":"web_search","confidence":0.9}"#).unwrap();
        assert_eq!(parsed.intent, Intent::WebSearch);
        assert_eq!(parsed.confidence, 0.9);
        assert_eq!(parsed.slots, Slots::default());
    }

    #[test]
    fn object_wrapped_in_prose_and_fences() {
        let reply = "Sure! Here you go:\n```json\n{\"intent\": \"edit_request\", \"confidence\": 0.8, \
                     \"slots\": {\"edit_target\": \"selection\"}, \"reasoning\": \"asks to fix\"}\n```";
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(parsed.intent, Intent::EditRequest);
        assert_eq!(parsed.slots.edit_target, Some(EditTarget::Selection));
        assert_eq!(parsed.reasoning.as_deref(), Some("asks to fix"));
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let reply = r#"{"intent":"ask","confidence":0.5,"reasoning":"user typed \"{\" and }"}"#;
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(parsed.intent, Intent::Ask);
    }

    #[test]
    fn skips_unparseable_leading_brace() {
        let reply = r#"set {x} then {"intent":"other","confidence":0.7}"#;
        assert_eq!(parse_reply(reply).unwrap().intent, Intent::Other);
    }

    #[test]
    fn confidence_is_clamped() {
        let parsed = parse_reply(r#"{"intent":"ask","confidence":1.7}"#).unwrap();
        assert_eq!(parsed.confidence, 1.0);
        let parsed = parse_reply(r#"{"intent":"ask","confidence":-2}"#).unwrap();
        assert_eq!(parsed.confidence, 0.0);
    }

    #[test]
    fn rejects_schema_violations() {
        assert_eq!(parse_reply("no json here"), Err(ParseFailure::NoJsonObject));
        assert_eq!(
            parse_reply(r#"{"confidence":0.5}"#),
            Err(ParseFailure::MissingIntent)
        );
        assert!(matches!(
            parse_reply(r#"{"intent":"shopping","confidence":0.5}"#),
            Err(ParseFailure::UnknownIntent(_))
        ));
        assert_eq!(
            parse_reply(r#"{"intent":"ask","confidence":"high"}"#),
            Err(ParseFailure::MissingConfidence)
        );
        assert!(matches!(
            parse_reply(r#"{"intent":"ask","confidence":0.5,"slots":[1]}"#),
            Err(ParseFailure::InvalidSlots(_))
        ));
    }

    #[test]
    fn unterminated_object_is_not_json() {
        assert_eq!(
            parse_reply(r#"{"intent":"ask","confidence":0.5"#),
            Err(ParseFailure::NoJsonObject)
        );
    }
}
