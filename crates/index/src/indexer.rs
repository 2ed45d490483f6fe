//! Indexer: load, split, embed and store a directory tree.

use crate::embeddings::EmbeddingProvider;
use crate::loader::load_documents;
use crate::progress::{Phase, ProgressReporter};
use crate::splitter::Splitter;
use crate::store::{sanitize_collection_name, VectorStore};
use crate::types::{EmbeddingRecord, IndexStats};
use archimind_core::config::IndexSettings;
use archimind_core::{AppError, AppResult};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Indexes directory trees into named collections.
pub struct Indexer {
    provider: Arc<dyn EmbeddingProvider>,
    settings: IndexSettings,
    splitter: Splitter,
    batch_size: usize,
    progress: ProgressReporter,
}

impl Indexer {
    /// Create an indexer.
    ///
    /// # Errors
    /// Returns `AppError::Config` for invalid chunk settings.
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        settings: &IndexSettings,
        batch_size: usize,
    ) -> AppResult<Self> {
        Ok(Self {
            provider,
            settings: settings.clone(),
            splitter: Splitter::from_settings(settings)?,
            batch_size: batch_size.max(1),
            progress: ProgressReporter::noop(),
        })
    }

    /// Attach a progress reporter.
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Index every allowed file under `root` into `collection`.
    ///
    /// Records are appended; all chunks of a run are written in a single
    /// transaction after embedding succeeds, so a failed run leaves the
    /// collection unchanged. Finding no files logs a warning and returns
    /// zero counts without touching the store.
    pub async fn index_directory(
        &self,
        store: &mut VectorStore,
        root: &Path,
        collection: &str,
    ) -> AppResult<IndexStats> {
        let started = Instant::now();
        let collection = sanitize_collection_name(collection);
        let mut stats = IndexStats {
            collection: collection.clone(),
            ..Default::default()
        };

        tracing::info!("Indexing {:?} into collection '{}'", root, collection);

        self.progress
            .report(Phase::Load, 0, None, format!("scanning {}", root.display()));
        let documents = load_documents(root, &self.settings)?;
        if documents.is_empty() {
            tracing::warn!("No valid files found in {:?}", root);
            stats.duration_ms = started.elapsed().as_millis() as u64;
            return Ok(stats);
        }

        stats.documents = documents.len();
        stats.bytes = documents.iter().map(|d| d.size_bytes).sum();
        self.progress.report(
            Phase::Load,
            documents.len() as u64,
            Some(documents.len() as u64),
            format!("{} files loaded", documents.len()),
        );

        let total_docs = documents.len() as u64;
        let mut chunks = Vec::new();
        for (i, document) in documents.iter().enumerate() {
            chunks.extend(self.splitter.split_document(document));
            self.progress
                .report(Phase::Split, i as u64 + 1, Some(total_docs), &document.path);
        }

        if chunks.is_empty() {
            tracing::warn!("Files in {:?} produced no chunks", root);
            stats.duration_ms = started.elapsed().as_millis() as u64;
            return Ok(stats);
        }

        tracing::info!(
            "Embedding {} chunks from {} files (provider: {}, model: {})",
            chunks.len(),
            documents.len(),
            self.provider.provider_name(),
            self.provider.model_name()
        );

        let total_chunks = chunks.len() as u64;
        let mut records = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = self.provider.embed_batch(&texts).await?;

            if embeddings.len() != batch.len() {
                return Err(AppError::Index(format!(
                    "Embedding provider returned {} vectors for {} chunks",
                    embeddings.len(),
                    batch.len()
                )));
            }

            records.extend(
                batch
                    .iter()
                    .cloned()
                    .zip(embeddings)
                    .map(|(chunk, embedding)| EmbeddingRecord { chunk, embedding }),
            );

            self.progress.report(
                Phase::Embed,
                records.len() as u64,
                Some(total_chunks),
                format!("model={}", self.provider.model_name()),
            );
        }

        self.progress
            .report(Phase::Store, 0, Some(total_chunks), "writing to vector store");
        stats.chunks = store.add(&collection, &records)?;
        self.progress
            .report(Phase::Store, total_chunks, Some(total_chunks), "done");

        stats.duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            "Indexed {} chunks from {} files into '{}' in {}ms",
            stats.chunks,
            stats.documents,
            collection,
            stats.duration_ms
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;
    use crate::progress::ProgressEvent;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn indexer(chunk_size: usize, overlap: usize) -> Indexer {
        let settings = IndexSettings {
            chunk_size,
            chunk_overlap: overlap,
            ..Default::default()
        };
        Indexer::new(Arc::new(TrigramProvider::new(64)), &settings, 2).unwrap()
    }

    #[tokio::test]
    async fn test_index_empty_directory_adds_nothing() {
        let temp = TempDir::new().unwrap();
        let mut store = VectorStore::in_memory().unwrap();

        let stats = indexer(2000, 200)
            .index_directory(&mut store, temp.path(), "practices")
            .await
            .unwrap();

        assert_eq!(stats.documents, 0);
        assert_eq!(stats.chunks, 0);
        assert!(!store.collection_exists("practices").unwrap());
    }

    #[tokio::test]
    async fn test_index_directory_stores_chunks() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "def add(a, b):\n    return a + b\n").unwrap();
        fs::write(
            temp.path().join("b.md"),
            "Connection pooling notes. ".repeat(40),
        )
        .unwrap();
        fs::write(temp.path().join("skip.bin"), "binary").unwrap();

        let mut store = VectorStore::in_memory().unwrap();
        let stats = indexer(200, 20)
            .index_directory(&mut store, temp.path(), "my-practices")
            .await
            .unwrap();

        assert_eq!(stats.collection, "my_practices");
        assert_eq!(stats.documents, 2);
        assert!(stats.chunks > 2);
        assert_eq!(store.count("my_practices").unwrap(), stats.chunks);
    }

    #[tokio::test]
    async fn test_reindexing_appends() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.rs"), "fn main() {}").unwrap();

        let mut store = VectorStore::in_memory().unwrap();
        let indexer = indexer(2000, 200);
        indexer.index_directory(&mut store, temp.path(), "kb").await.unwrap();
        indexer.index_directory(&mut store, temp.path(), "kb").await.unwrap();

        assert_eq!(store.count("kb").unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reports_every_phase() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.rs"), "fn main() {}").unwrap();

        let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::new(Arc::new(move |e| sink.lock().unwrap().push(e)));

        let mut store = VectorStore::in_memory().unwrap();
        indexer(2000, 200)
            .with_progress(reporter)
            .index_directory(&mut store, temp.path(), "kb")
            .await
            .unwrap();

        let phases: Vec<Phase> = events.lock().unwrap().iter().map(|e| e.phase).collect();
        for phase in [Phase::Load, Phase::Split, Phase::Embed, Phase::Store] {
            assert!(phases.contains(&phase), "missing phase {}", phase);
        }
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let mut store = VectorStore::in_memory().unwrap();
        let result = indexer(2000, 200)
            .index_directory(&mut store, &temp.path().join("missing"), "kb")
            .await;
        assert!(result.is_err());
    }
}
