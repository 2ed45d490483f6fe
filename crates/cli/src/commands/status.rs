//! Status command handler.

use super::print_json;
use archimind_analysis::{JobState, StatusFile};
use archimind_core::{config::AppConfig, AppResult};
use clap::Args;

/// Show the last analysis status
#[derive(Args, Debug)]
pub struct StatusCommand {
    /// Output the full status file as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let file = StatusFile::new(config.status_path());
        let Some(status) = file.read()? else {
            if self.json {
                print_json(&serde_json::Value::Null)?;
            } else {
                println!("No analysis has been run in this workspace");
            }
            return Ok(());
        };

        if self.json {
            return print_json(&serde_json::to_value(&status)?);
        }

        match status.status {
            JobState::Processing => println!("Analysis in progress"),
            JobState::Completed => {
                println!("Analysis completed");
                if let Some(result) = &status.result {
                    println!("  Repository: {} ({})", result.repo_name, result.repo_url);
                    println!("  HLD graph: {}", graph_state(result.hld_graph.is_ok()));
                    println!("  LLD graph: {}", graph_state(result.lld_graph.is_ok()));
                    println!("  Summary: {}", result.chat_summary);
                }
            }
            JobState::Error => println!(
                "Analysis failed: {}",
                status.error.as_deref().unwrap_or("unknown error")
            ),
        }

        Ok(())
    }
}

fn graph_state(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}
