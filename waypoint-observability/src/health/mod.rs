//! Health reporting across the router's subsystems.

pub mod recommendations;
pub mod reporter;
pub mod subsystem_checks;

pub use recommendations::{Recommendation, Severity};
pub use reporter::{HealthReporter, HealthSnapshot};
pub use subsystem_checks::SubsystemChecker;
