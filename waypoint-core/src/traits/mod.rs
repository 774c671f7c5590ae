mod chunk_lookup;
mod completion;
mod embedding;
mod vector_store;
mod web_search;

pub use chunk_lookup::IChunkLookup;
pub use completion::{ChatMessage, ChatRole, CompletionOptions, ICompletionProvider};
pub use embedding::IEmbeddingProvider;
pub use vector_store::{ChunkMetadata, IVectorStore, VectorFilter, VectorMatch};
pub use web_search::IWebSearchProvider;
