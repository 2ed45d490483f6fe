//! Collections command handler.

use super::{open_store, print_json};
use archimind_core::{config::AppConfig, AppResult};
use clap::Args;

/// List collections in the vector store
#[derive(Args, Debug)]
pub struct CollectionsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CollectionsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let collections = open_store(config)?.list_collections()?;

        if self.json {
            return print_json(&serde_json::to_value(&collections)?);
        }

        if collections.is_empty() {
            println!("No collections. Create one with 'archimind index <collection> <path>'.");
            return Ok(());
        }

        for info in &collections {
            println!(
                "{}: {} chunks from {} sources (dim {}, created {})",
                info.name,
                info.chunks,
                info.sources,
                info.dimension,
                info.created_at.format("%Y-%m-%d %H:%M")
            );
        }

        Ok(())
    }
}
