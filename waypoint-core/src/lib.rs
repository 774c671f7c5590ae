//! # waypoint-core
//!
//! Foundation crate for the Waypoint intent router.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod cancellation;
pub mod config;
pub mod constants;
pub mod errors;
pub mod intent;
pub mod models;
pub mod text;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use cancellation::CancellationToken;
pub use config::WaypointConfig;
pub use errors::{WaypointError, WaypointResult};
pub use intent::{Intent, IntentClassification, Slots};
pub use models::{ContextRef, Instruction, RagChunk, RouterContext, RouterResponse, TaskKind};
