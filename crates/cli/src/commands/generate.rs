//! Generate command handler.

use super::{assistant, open_store, top_k};
use archimind_core::{config::AppConfig, AppResult};
use clap::Args;
use std::path::PathBuf;

/// Generate code informed by the practices collection
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// What the code should do
    pub description: String,

    /// Number of practice examples to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Write the generated code to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl GenerateCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing generate command");
        tracing::debug!("Generate options: {:?}", self);

        let store = open_store(config)?;
        let code = assistant(config)?
            .generate_code(&store, &self.description, top_k(self.top_k, config))
            .await?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, format!("{}\n", code))?;
                eprintln!("Wrote generated code to {}", path.display());
            }
            None => println!("{}", code),
        }

        Ok(())
    }
}
