//! End-to-end repository analysis.

use crate::docs::generate_all;
use crate::generator::Generator;
use crate::graph::parse_graph;
use crate::repo::{clone_repository, repo_name};
use crate::status::{AnalysisResult, JobStatus, StatusFile};
use archimind_core::config::AppConfig;
use archimind_core::{AppError, AppResult};
use archimind_index::{
    sanitize_collection_name, EmbeddingProvider, Indexer, Retriever, VectorStore,
};
use archimind_llm::LlmClient;
use std::path::PathBuf;
use std::sync::Arc;

/// Query used to pull documentation context out of an indexed repository.
pub const DOCUMENTATION_QUERY: &str =
    "Generate a complete technical documentation for this software project.";

/// Chunks retrieved for documentation.
pub const DOCUMENTATION_TOP_K: usize = 15;

/// Clones, indexes and documents repositories, reporting through the
/// status file.
pub struct Analyzer {
    config: AppConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Generator,
    status: StatusFile,
}

impl Analyzer {
    pub fn new(
        config: AppConfig,
        llm: Arc<dyn LlmClient>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        let generator = Generator::new(llm, &config.llm, config.prompts_dir());
        let status = StatusFile::new(config.status_path());
        Self {
            config,
            embedder,
            generator,
            status,
        }
    }

    pub fn status_file(&self) -> &StatusFile {
        &self.status
    }

    /// Run the full pipeline for `repo_url`.
    ///
    /// The status file moves to `processing`, then to `completed` with the
    /// generated artefacts or to `error` with the failure message. Pipeline
    /// failures are recorded there rather than returned; only a status file
    /// that cannot be written is an error.
    pub async fn run_analysis(
        &self,
        repo_url: &str,
        clone_dir: Option<PathBuf>,
    ) -> AppResult<JobStatus> {
        self.status.write(&JobStatus::processing())?;

        let status = match self.analyze(repo_url, clone_dir).await {
            Ok(result) => {
                tracing::info!("Analysis of {} completed", repo_url);
                JobStatus::completed(result)
            }
            Err(e) => {
                tracing::error!("Analysis of {} failed: {}", repo_url, e);
                JobStatus::failed(e.to_string())
            }
        };

        self.status.write(&status)?;
        Ok(status)
    }

    async fn analyze(
        &self,
        repo_url: &str,
        clone_dir: Option<PathBuf>,
    ) -> AppResult<AnalysisResult> {
        let name = repo_name(repo_url);
        if name.is_empty() {
            return Err(AppError::Analysis(format!(
                "Cannot derive a repository name from '{}'",
                repo_url
            )));
        }
        tracing::info!("Starting analysis for repository: {}", name);

        let target = clone_dir.unwrap_or_else(|| self.config.repos_dir().join(&name));
        let url = repo_url.to_string();
        let clone_target = target.clone();
        tokio::task::spawn_blocking(move || clone_repository(&url, &clone_target))
            .await
            .map_err(|e| AppError::Analysis(format!("Clone task failed: {}", e)))??;

        let collection = sanitize_collection_name(&name);
        let mut store = VectorStore::open_in(&self.config.store_dir())?;

        if store.count(&collection)? == 0 {
            let indexer = Indexer::new(
                self.embedder.clone(),
                &self.config.index,
                self.config.embedding.batch_size,
            )?;
            let stats = indexer
                .index_directory(&mut store, &target, &collection)
                .await?;
            if stats.chunks == 0 {
                return Err(AppError::Analysis(
                    "No processable files found in repository".to_string(),
                ));
            }
        } else {
            tracing::info!("Collection '{}' already indexed, reusing it", collection);
        }

        let retriever = Retriever::new(self.embedder.clone());
        let context = retriever
            .query_collection(&store, &collection, DOCUMENTATION_QUERY, DOCUMENTATION_TOP_K)
            .await;
        if context.is_empty() {
            return Err(AppError::Analysis(
                "Failed to retrieve context from vector store".to_string(),
            ));
        }

        let docs = generate_all(&self.generator, &context, &name).await?;

        Ok(AnalysisResult {
            documentation: docs.documentation,
            hld_graph: parse_graph(&docs.hld, "HLD"),
            lld_graph: parse_graph(&docs.lld, "LLD"),
            chat_summary: docs.summary,
            repo_name: name,
            repo_url: repo_url.to_string(),
        })
    }
}
