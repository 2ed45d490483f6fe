//! Repository documentation generation.

use crate::generator::Generator;
use archimind_core::AppResult;
use archimind_prompt::{DOCS_HANDBOOK, DOCS_HLD, DOCS_LLD, DOCS_SUMMARY};

/// Raw model output for every documentation artefact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedDocs {
    /// Markdown handbook
    pub documentation: String,
    /// High-level design diagram JSON, unparsed
    pub hld: String,
    /// Low-level design diagram JSON, unparsed
    pub lld: String,
    /// Conversational summary
    pub summary: String,
}

/// Generate the handbook, both diagrams and the summary for `repo` from the
/// retrieved `context`.
pub async fn generate_all(
    generator: &Generator,
    context: &str,
    repo: &str,
) -> AppResult<GeneratedDocs> {
    let vars = [("context", context), ("repo", repo)];

    tracing::info!("Generating documentation for '{}'", repo);
    let documentation = generator.run(DOCS_HANDBOOK, &vars).await?;

    tracing::info!("Generating high-level design for '{}'", repo);
    let hld = generator.run(DOCS_HLD, &vars).await?;

    tracing::info!("Generating low-level design for '{}'", repo);
    let lld = generator.run(DOCS_LLD, &vars).await?;

    let summary = generator.run(DOCS_SUMMARY, &vars).await?;

    Ok(GeneratedDocs {
        documentation: documentation.trim().to_string(),
        hld,
        lld,
        summary: summary.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::tests::RecordingClient;
    use archimind_core::config::LlmSettings;

    #[tokio::test]
    async fn test_generate_all_runs_each_prompt() {
        let temp = tempfile::TempDir::new().unwrap();
        let client = RecordingClient::new("  output  ");
        let generator = Generator::new(client.clone(), &LlmSettings::default(), temp.path().into());

        let docs = generate_all(&generator, "--- From: app.py ---\nx = 1", "shop")
            .await
            .unwrap();

        assert_eq!(docs.documentation, "output");
        assert_eq!(docs.hld, "  output  ");

        let prompts = client.prompts();
        assert_eq!(prompts.len(), 4);
        assert!(prompts[0].contains("# shop Architecture Handbook"));
        assert!(prompts[1].contains("graph TD"));
        assert!(prompts[2].contains("sequenceDiagram"));
        assert!(prompts.iter().all(|p| p.contains("--- From: app.py ---")));
    }
}
