//! Context assembly for prompts.

use crate::types::ScoredChunk;

/// Join retrieved chunks into a single prompt-context string.
///
/// Each chunk is rendered as `--- From: <path> ---` followed by its text;
/// pieces are separated by a blank line. No chunks gives an empty string.
pub fn assemble_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| format!("--- From: {} ---\n{}", chunk.metadata.source, chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
