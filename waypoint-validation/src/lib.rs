//! # waypoint-validation
//!
//! Verification of evidence bundles before generation, and of citation
//! markers after.
//!
//! ## Dimensions
//! 1. **Schema**: required fields, enum membership, numeric ranges
//! 2. **Citation**: every `doc` ref names a retrieved chunk; blank text warns
//! 3. **Coverage**: `telemetry.coverage` against the task's threshold
//! 4. **Diversity**: factual tasks should cite more than one source
//!
//! Findings are data: `VerificationResult` carries errors and warnings and
//! never surfaces as an `Err`.

pub mod dimensions;
pub mod engine;
pub mod response;

pub use engine::{verify, verify_value, InstructionVerifier};
pub use response::validate_response;
