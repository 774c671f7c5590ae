//! # waypoint-classifier
//!
//! The two trained/generative tiers of the intent cascade.
//!
//! ## Architecture
//!
//! ```text
//! LinearClassifier
//! ├── one-vs-all logistic regression (rayon, one fit per intent)
//! ├── z-score normalisation with training statistics
//! └── RwLock<Option<Arc<ClassifierWeights>>> (swapped after training)
//!
//! FewShotClassifier
//! ├── nearest labeled examples (EmbeddingStore)
//! ├── prompt (system + user message)
//! ├── ICompletionProvider (ApiCompletionProvider), timeout + cancellation
//! └── brace-matching JSON extraction → schema validation → ask/0.3 fallback
//! ```

pub mod few_shot;
pub mod linear;

pub use few_shot::{ApiCompletionProvider, FewShotClassifier, FewShotOutcome};
pub use linear::{
    ClassifierWeights, IntentMetrics, LinearClassifier, LinearPrediction, TrainingMetrics,
};
