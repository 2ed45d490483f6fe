//! Retriever: embed a query and fetch the nearest stored chunks.

use crate::context::assemble_context;
use crate::embeddings::EmbeddingProvider;
use crate::store::VectorStore;
use crate::types::ScoredChunk;
use archimind_core::AppResult;
use std::sync::Arc;

/// Answers similarity queries against a vector store.
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Return the `k` chunks of `collection` most similar to `query`.
    ///
    /// `k == 0`, a missing collection, or an empty collection all yield an
    /// empty result without calling the embedding provider.
    pub async fn retrieve(
        &self,
        store: &VectorStore,
        collection: &str,
        query: &str,
        k: usize,
    ) -> AppResult<Vec<ScoredChunk>> {
        if k == 0 || store.count(collection)? == 0 {
            tracing::debug!("Collection '{}' is missing or empty", collection);
            return Ok(Vec::new());
        }

        let embedding = self.provider.embed(query).await?;
        store.query(collection, &embedding, k)
    }

    /// Retrieve and assemble a context string.
    ///
    /// Never fails: errors are logged as warnings and produce an empty
    /// string, as does a missing or empty collection.
    pub async fn query_collection(
        &self,
        store: &VectorStore,
        collection: &str,
        query: &str,
        k: usize,
    ) -> String {
        match self.retrieve(store, collection, query, k).await {
            Ok(chunks) if chunks.is_empty() => {
                tracing::warn!(
                    "No context retrieved from collection '{}'; it may be missing or empty",
                    collection
                );
                String::new()
            }
            Ok(chunks) => assemble_context(&chunks),
            Err(e) => {
                tracing::warn!("Could not query collection '{}': {}", collection, e);
                String::new()
            }
        }
    }
}
