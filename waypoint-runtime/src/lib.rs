//! # waypoint-runtime
//!
//! Composition root. Owns every engine and exposes the request path.
//!
//! ```text
//! classify_intent
//!   └── IntentRouter (embedding vote ∥ linear classifier → third tier)
//! build_and_verify_instruction
//!   ├── RetrievalAdapter::assemble (search → expand → pack → score)
//!   ├── InstructionBuilder::build
//!   └── InstructionVerifier::verify (schema → citations → coverage → diversity)
//! add_feedback / retrain / get_metrics / health
//! ```

mod runtime;

pub use runtime::{InstructionOutcome, RuntimeOptions, WaypointRuntime};
