mod degradation_event;
mod health_report;
mod instruction;
mod labeled_example;
mod rag_chunk;
mod router;
mod verification;

pub use degradation_event::DegradationEvent;
pub use health_report::{HealthMetrics, HealthReport, HealthStatus, SubsystemHealth};
pub use instruction::{
    ContextRef, Instruction, InstructionInputs, OutputFormat, Policies, TaskKind, Telemetry,
};
pub use labeled_example::{ExampleSource, LabeledExample};
pub use rag_chunk::{RagChunk, WebResult};
pub use router::{RouterContext, RouterFeatures, RouterResponse, RoutingMethod};
pub use verification::{ResponseValidation, VerificationResult};
