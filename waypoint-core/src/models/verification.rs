use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Outcome of verifying an instruction. Findings are data, never errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VerificationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub citations_valid: bool,
    pub coverage_adequate: bool,
}

/// Outcome of checking a generated answer's citation markers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResponseValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    /// 1-based marker indices found in the answer, in order of appearance.
    pub markers: Vec<usize>,
}
