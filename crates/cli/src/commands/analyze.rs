//! Analyze command handler.

use super::{embedder, print_json};
use archimind_analysis::{Analyzer, JobState};
use archimind_core::{config::AppConfig, AppError, AppResult};
use archimind_llm::create_client;
use clap::Args;
use std::path::PathBuf;

/// Clone, index and document a repository
#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// Repository URL (or local path) to clone
    pub repo_url: String,

    /// Clone into this directory instead of the workspace repos directory
    #[arg(long)]
    pub clone_dir: Option<PathBuf>,
}

impl AnalyzeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing analyze command for {}", self.repo_url);

        let analyzer = Analyzer::new(
            config.clone(),
            create_client(&config.llm)?,
            embedder(config)?,
        );
        let status = analyzer
            .run_analysis(&self.repo_url, self.clone_dir.clone())
            .await?;

        print_json(&serde_json::to_value(&status)?)?;
        eprintln!("Status written to {}", analyzer.status_file().path().display());

        match status.status {
            JobState::Error => Err(AppError::Analysis(
                status.error.unwrap_or_else(|| "Analysis failed".to_string()),
            )),
            _ => Ok(()),
        }
    }
}
