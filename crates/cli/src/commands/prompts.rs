//! Prompts command handler.

use super::print_json;
use archimind_core::{config::AppConfig, AppResult};
use archimind_prompt::{list_prompts, load_prompt};
use clap::Args;

/// List available prompts
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let prompts_dir = config.prompts_dir();
        let mut entries = Vec::new();
        for id in list_prompts(&prompts_dir)? {
            let definition = load_prompt(&prompts_dir, &id)?;
            let overridden = prompts_dir.join(format!("{}.yml", id)).exists();
            entries.push((definition, overridden));
        }

        if self.json {
            let output: Vec<_> = entries
                .iter()
                .map(|(def, overridden)| {
                    serde_json::json!({
                        "id": def.id,
                        "title": def.title,
                        "outputFormat": def.output.format,
                        "overridden": overridden,
                    })
                })
                .collect();
            return print_json(&serde_json::Value::Array(output));
        }

        for (def, overridden) in &entries {
            let marker = if *overridden { " (workspace)" } else { "" };
            println!("{:<16} {}{}", def.id, def.title, marker);
        }

        Ok(())
    }
}
