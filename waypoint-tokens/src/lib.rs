//! # waypoint-tokens
//!
//! Token estimation via `tiktoken-rs` (`cl100k_base`), used to cost chunks
//! that arrive without a token count. Caches results per content hash.

pub mod budget;
pub mod counter;

pub use budget::TokenBudget;
pub use counter::TokenCounter;
