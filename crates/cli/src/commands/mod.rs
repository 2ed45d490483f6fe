//! Command handlers for the ArchiMind CLI.
//!
//! Each subcommand lives in its own module; shared wiring (store, embedder,
//! assistant construction) is kept here.

pub mod analyze;
pub mod ask;
pub mod collections;
pub mod generate;
pub mod index;
pub mod prompts;
pub mod query;
pub mod review;
pub mod status;

pub use analyze::AnalyzeCommand;
pub use ask::AskCommand;
pub use collections::CollectionsCommand;
pub use generate::GenerateCommand;
pub use index::IndexCommand;
pub use prompts::PromptsCommand;
pub use query::QueryCommand;
pub use review::ReviewCommand;
pub use status::StatusCommand;

use archimind_analysis::{Assistant, Generator};
use archimind_core::{config::AppConfig, AppResult};
use archimind_index::{create_provider, EmbeddingProvider, Retriever, VectorStore};
use archimind_llm::create_client;
use serde_json::Value;
use std::sync::Arc;

/// Open the workspace vector store.
pub(crate) fn open_store(config: &AppConfig) -> AppResult<VectorStore> {
    VectorStore::open_in(&config.store_dir())
}

/// Build the configured embedding provider.
pub(crate) fn embedder(config: &AppConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    create_provider(&config.embedding, config.embedding_endpoint())
}

/// Wire retrieval and generation for the assistant commands.
pub(crate) fn assistant(config: &AppConfig) -> AppResult<Assistant> {
    let client = create_client(&config.llm)?;
    let generator = Generator::new(client, &config.llm, config.prompts_dir());
    let retriever = Retriever::new(embedder(config)?);
    Ok(Assistant::new(generator, retriever))
}

/// Explicit `-k` or the configured default.
pub(crate) fn top_k(requested: Option<usize>, config: &AppConfig) -> usize {
    requested.unwrap_or(config.index.top_k)
}

pub(crate) fn print_json(value: &Value) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
