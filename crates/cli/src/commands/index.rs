//! Index command handler.

use super::{embedder, open_store, print_json};
use archimind_core::{config::AppConfig, AppError, AppResult};
use archimind_index::{Indexer, ProgressEvent, ProgressReporter};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Index a directory into a collection
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// Collection name
    pub collection: String,

    /// Directory (or single file) to index
    pub path: PathBuf,

    /// Delete the collection before indexing
    #[arg(long)]
    pub reset: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IndexCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!(
            "Executing index command for collection '{}' from {:?}",
            self.collection,
            self.path
        );

        if !self.path.exists() {
            return Err(AppError::Index(format!(
                "Path does not exist: {:?}",
                self.path
            )));
        }

        let mut store = open_store(config)?;
        if self.reset && store.delete_collection(&self.collection)? {
            tracing::info!("Reset collection '{}'", self.collection);
        }

        let progress = if self.json {
            ProgressReporter::noop()
        } else {
            ProgressReporter::new(Arc::new(|event: ProgressEvent| {
                eprintln!("{}", event.format_simple())
            }))
        };

        let indexer = Indexer::new(embedder(config)?, &config.index, config.embedding.batch_size)?
            .with_progress(progress);
        let stats = indexer
            .index_directory(&mut store, &self.path, &self.collection)
            .await?;

        if self.json {
            print_json(&serde_json::to_value(&stats)?)?;
        } else {
            println!(
                "Indexed {} documents ({} chunks, {} bytes) into '{}' in {:.2}s",
                stats.documents,
                stats.chunks,
                stats.bytes,
                stats.collection,
                stats.duration_ms as f64 / 1000.0
            );
        }

        Ok(())
    }
}
