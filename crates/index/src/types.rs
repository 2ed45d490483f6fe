//! Data types shared across the indexing pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A source file loaded for indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Path relative to the loaded root, with `/` separators
    pub path: String,

    /// Absolute path on disk
    pub absolute_path: PathBuf,

    /// Extension including the leading dot, or the file name for
    /// extensionless files such as `Dockerfile`
    pub extension: String,

    /// File contents (invalid UTF-8 replaced)
    pub content: String,

    /// Size on disk in bytes
    pub size_bytes: u64,
}

/// A bounded slice of a document, the unit of embedding and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk identifier
    pub id: String,

    /// Chunk text
    pub text: String,

    /// Provenance of the chunk
    pub metadata: ChunkMetadata,
}

/// Provenance attached to every chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source document path, relative to the indexed root
    pub source: String,

    /// Zero-based position of the chunk within its document
    pub position: u32,

    /// Byte offset of the chunk start in the document
    pub start_byte: usize,

    /// Byte offset one past the chunk end
    pub end_byte: usize,

    /// One-based first line
    pub start_line: usize,

    /// One-based last line
    pub end_line: usize,

    /// SHA-256 of the chunk text, hex encoded
    pub content_hash: String,
}

/// A chunk paired with its embedding, ready to be stored.
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// A stored chunk returned from a similarity query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Chunk identifier
    pub id: String,

    /// Chunk text
    pub text: String,

    /// Chunk provenance
    pub metadata: ChunkMetadata,

    /// Cosine similarity to the query
    pub score: f32,
}

/// Summary of one indexing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub collection: String,
    pub documents: usize,
    pub chunks: usize,
    pub bytes: u64,
    pub duration_ms: u64,
}

/// Description of a stored collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    pub name: String,
    pub dimension: usize,
    pub chunks: usize,
    pub sources: usize,
    pub created_at: DateTime<Utc>,
}
