//! Query command handler.
//!
//! Prints the assembled context string exactly as the generation prompts
//! receive it.

use super::{embedder, open_store, top_k};
use archimind_core::{config::AppConfig, AppResult};
use archimind_index::Retriever;
use clap::Args;

/// Print the context retrieved from a collection
#[derive(Args, Debug)]
pub struct QueryCommand {
    /// Collection name
    pub collection: String,

    /// Query text
    pub query: String,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

impl QueryCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing query command for collection '{}'", self.collection);

        let store = open_store(config)?;
        let retriever = Retriever::new(embedder(config)?);
        let context = retriever
            .query_collection(&store, &self.collection, &self.query, top_k(self.top_k, config))
            .await;

        if context.is_empty() {
            eprintln!("No context found in collection '{}'", self.collection);
        } else {
            println!("{}", context);
        }

        Ok(())
    }
}
