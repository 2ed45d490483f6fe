//! Trigram hashing embeddings for offline use.

use crate::embeddings::provider::EmbeddingProvider;
use archimind_core::AppResult;
use std::collections::HashMap;

/// Deterministic, content-aware embeddings built from hashed identifier
/// tokens and their character trigrams.
///
/// Not semantically meaningful like a neural model, but texts sharing
/// vocabulary land close together, which is enough for offline indexing
/// and tests.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "was", "were", "with", "from", "this", "that", "have", "has",
    "had", "its", "their", "they", "them", "but", "not", "you", "your",
];

impl TrigramProvider {
    /// Create a provider producing vectors of `dimensions` components.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        let lower = text.to_lowercase();
        let mut frequencies: HashMap<&str, u32> = HashMap::new();
        for token in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.chars().count() > 2 && !STOP_WORDS.contains(t))
        {
            *frequencies.entry(token).or_insert(0) += 1;
        }

        for (token, freq) in &frequencies {
            let chars: Vec<char> = token.chars().collect();
            for window in chars.windows(3) {
                let idx = self.bucket(window.iter().collect::<String>().as_bytes(), 37);
                embedding[idx] += (*freq as f32).sqrt();
            }

            let idx = self.bucket(token.as_bytes(), 31);
            embedding[idx] += *freq as f32;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }

    fn bucket(&self, bytes: &[u8], multiplier: u64) -> usize {
        let hash = bytes
            .iter()
            .fold(0u64, |acc, b| acc.wrapping_mul(multiplier).wrapping_add(*b as u64));
        (hash % self.dimensions as u64) as usize
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
