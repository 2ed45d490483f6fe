//! Review command handler.

use super::{assistant, open_store, top_k};
use archimind_core::{config::AppConfig, AppError, AppResult};
use clap::Args;
use std::path::PathBuf;

/// Review a file against the bad practices collection
#[derive(Args, Debug)]
pub struct ReviewCommand {
    /// File to review
    pub file: PathBuf,

    /// Number of anti-pattern examples to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

impl ReviewCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing review command for {:?}", self.file);

        let code = std::fs::read_to_string(&self.file).map_err(|e| {
            AppError::Config(format!("Failed to read {}: {}", self.file.display(), e))
        })?;
        if code.trim().is_empty() {
            return Err(AppError::Config(format!(
                "Nothing to review: {} is empty",
                self.file.display()
            )));
        }

        let store = open_store(config)?;
        let review = assistant(config)?
            .review_code(&store, &code, top_k(self.top_k, config))
            .await?;

        println!("{}", review);
        Ok(())
    }
}
