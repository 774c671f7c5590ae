/// Linear classifier errors.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("no training examples supplied")]
    EmptyTrainingSet,

    #[error("inconsistent feature dimensions: expected {expected}, got {actual}")]
    InconsistentDimensions { expected: usize, actual: usize },

    #[error("failed to persist weights to {path}: {reason}")]
    PersistFailed { path: String, reason: String },

    #[error("training task did not complete: {reason}")]
    TrainingAborted { reason: String },
}
