pub mod builder;
pub mod task;

pub use builder::InstructionBuilder;
pub use task::select_task;
