//! # waypoint-embeddings
//!
//! Embedding generation with a two-tier cache, and the labeled-example
//! store the router's nearest-neighbour tier votes over.
//!
//! ## Architecture
//!
//! ```text
//! EmbeddingStore
//! ├── labeled examples (in-memory, linear cosine scan)
//! ├── IntentDistribution (top-k vote)
//! └── EmbeddingEngine
//!     ├── DegradationChain (provider fallback → zero vector)
//!     │   ├── ApiEmbeddingProvider (OpenAI-compatible)
//!     │   └── HashedEmbeddingProvider (offline)
//!     └── CacheCoordinator
//!         ├── L1 Memory (moka)
//!         └── L2 SQLite (persistent, optional)
//! ```

pub mod cache;
pub mod degradation;
pub mod distribution;
pub mod engine;
pub mod providers;
pub mod seeds;
pub mod similarity;
pub mod store;

pub use cache::{CacheCoordinator, CacheHitTier};
pub use degradation::DegradationChain;
pub use distribution::{IntentDistribution, IntentStats};
pub use engine::{Embedded, EmbeddingEngine, EmbeddingStats};
pub use providers::{ApiEmbeddingProvider, HashedEmbeddingProvider};
pub use seeds::{seed_examples, SeedExample};
pub use similarity::cosine_similarity;
pub use store::{EmbeddingStore, ExampleMetadata, SimilarExample};
