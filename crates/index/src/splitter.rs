//! Character-based text splitter with overlap.

use crate::types::{Chunk, ChunkMetadata, Document};
use archimind_core::config::IndexSettings;
use archimind_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use text_splitter::{Characters, ChunkConfig, TextSplitter};

/// Splits documents into chunks of at most `chunk_size` characters, each
/// sharing up to `chunk_overlap` characters with its predecessor.
///
/// Boundaries prefer paragraphs, then lines, sentences and words, so a chunk
/// only breaks inside a word when a single word exceeds the chunk size.
pub struct Splitter {
    inner: TextSplitter<Characters>,
    chunk_size: usize,
}

impl Splitter {
    /// Create a splitter.
    ///
    /// # Errors
    /// Returns `AppError::Config` when `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> AppResult<Self> {
        let config = ChunkConfig::new(chunk_size)
            .with_overlap(chunk_overlap)
            .map_err(|e| AppError::Config(format!("Invalid chunk settings: {}", e)))?;

        Ok(Self {
            inner: TextSplitter::new(config),
            chunk_size,
        })
    }

    /// Create a splitter from the index settings.
    pub fn from_settings(settings: &IndexSettings) -> AppResult<Self> {
        Self::new(settings.chunk_size, settings.chunk_overlap)
    }

    /// Maximum characters per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split a document. Whitespace-only pieces are dropped.
    pub fn split_document(&self, document: &Document) -> Vec<Chunk> {
        let text = document.content.as_str();
        let mut chunks = Vec::new();

        for (start, piece) in self.inner.chunk_indices(text) {
            if piece.trim().is_empty() {
                continue;
            }

            let end = start + piece.len();
            let start_line = text[..start].matches('\n').count() + 1;
            let end_line = start_line + piece.matches('\n').count();

            chunks.push(Chunk {
                id: uuid::Uuid::new_v4().to_string(),
                text: piece.to_string(),
                metadata: ChunkMetadata {
                    source: document.path.clone(),
                    position: chunks.len() as u32,
                    start_byte: start,
                    end_byte: end,
                    start_line,
                    end_line,
                    content_hash: content_hash(piece),
                },
            });
        }

        tracing::trace!("Split {} into {} chunks", document.path, chunks.len());
        chunks
    }
}

/// Hex-encoded SHA-256 of `text`.
pub fn content_hash(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}
