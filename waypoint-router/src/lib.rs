//! # waypoint-router
//!
//! The intent cascade. One query embedding feeds both the neighbour vote
//! and the linear classifier; the first tier to clear its threshold wins,
//! and a low-confidence third tier (few-shot completion, keyword heuristic,
//! or both) answers otherwise. Routing never fails.

mod heuristic;
mod orchestrator;
mod patterns;
mod slots;

pub use heuristic::heuristic_intent;
pub use orchestrator::IntentRouter;
pub use slots::{extract_topic, synthesize};
