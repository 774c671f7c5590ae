//! # waypoint-retrieval
//!
//! Evidence assembly for routed requests.
//!
//! ## Architecture
//!
//! ```text
//! RetrievalAdapter::assemble(response, query, scope)
//! ├── select_task (intent + slots + fact-check cue → TaskKind)
//! ├── VectorSearch (embed → IVectorStore, IChunkLookup fills missing text)
//! ├── HierarchyExpander (siblings × 0.85, parents × 0.75, dedup by id)
//! ├── pack (score order, whole chunks, one boundary truncation)
//! ├── search_web (IWebSearchProvider, web_search intents only)
//! └── scoring (confidence, coverage)
//!
//! InstructionBuilder: RouterResponse + Evidence → Instruction
//! InMemoryChunkIndex: IVectorStore + IChunkLookup for small corpora
//! ```
//!
//! Every collaborator call is bounded by `retrieval.timeout_ms` and the
//! caller's cancellation token. Failures degrade to empty results.

pub mod budget;
pub mod engine;
pub mod evidence;
pub mod expansion;
pub mod index;
pub mod instruction;
pub mod scoring;
pub mod search;

pub use budget::{pack, PackedContext};
pub use engine::RetrievalAdapter;
pub use evidence::Evidence;
pub use index::InMemoryChunkIndex;
pub use instruction::{select_task, InstructionBuilder};
pub use scoring::{confidence, coverage};
