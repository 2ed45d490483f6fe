//! ArchiMind vector indexing and retrieval pipeline.
//!
//! Loads source trees, splits them into overlapping character chunks, embeds
//! the chunks, persists them to named collections in a SQLite-backed vector
//! store, and serves k-nearest-neighbour queries as prompt context.

pub mod context;
pub mod embeddings;
pub mod indexer;
pub mod loader;
pub mod progress;
pub mod retriever;
pub mod splitter;
pub mod store;
pub mod types;

pub use context::assemble_context;
pub use embeddings::{create_provider, EmbeddingProvider};
pub use indexer::Indexer;
pub use loader::load_documents;
pub use progress::{Phase, ProgressEvent, ProgressReporter};
pub use retriever::Retriever;
pub use splitter::Splitter;
pub use store::{sanitize_collection_name, VectorStore, STORE_FILE};
pub use types::{
    Chunk, ChunkMetadata, CollectionInfo, Document, EmbeddingRecord, IndexStats, ScoredChunk,
};
