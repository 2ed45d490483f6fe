//! Ask command handler.
//!
//! Answers questions about a repository that was indexed (or analyzed) into
//! a collection.

use super::{assistant, open_store, top_k};
use archimind_core::{config::AppConfig, AppResult};
use clap::Args;

/// Ask a question about an indexed collection
#[derive(Args, Debug)]
pub struct AskCommand {
    /// Collection to answer from
    pub collection: String,

    /// The question to ask
    pub question: String,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command for collection '{}'", self.collection);
        tracing::debug!("Question: {}", self.question);

        let store = open_store(config)?;
        let answer = assistant(config)?
            .ask(&store, &self.collection, &self.question, top_k(self.top_k, config))
            .await?;

        println!("{}", answer);
        Ok(())
    }
}
