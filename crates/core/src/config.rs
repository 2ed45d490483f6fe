//! Configuration management for ArchiMind.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - Config file (`.archimind/config.yaml` in the workspace)
//! - Environment variables
//! - Command-line flags
//!
//! All persistent state (vector store, status file, clones, prompt overrides)
//! lives under `.archimind/` in the workspace.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Name of the per-workspace state directory.
pub const STATE_DIR: &str = ".archimind";

/// Providers accepted for text generation.
pub const LLM_PROVIDERS: [&str; 2] = ["ollama", "gemini"];

/// Providers accepted for embeddings.
pub const EMBEDDING_PROVIDERS: [&str; 2] = ["ollama", "trigram"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .archimind/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Text generation settings
    pub llm: LlmSettings,

    /// Embedding settings
    pub embedding: EmbeddingSettings,

    /// Loading, splitting and retrieval settings
    pub index: IndexSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmSettings {
    /// Provider name ("ollama" or "gemini")
    pub provider: String,

    /// Model identifier passed to the provider
    pub model: String,

    /// Base URL of the Ollama server
    pub ollama_url: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// API key for hosted providers, never written back to disk
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "stable-code:3b".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            api_key: None,
        }
    }
}

/// Embedding model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbeddingSettings {
    /// Provider name ("ollama" or "trigram")
    pub provider: String,

    /// Embedding model identifier
    pub model: String,

    /// Expected vector dimension
    pub dimensions: usize,

    /// Number of texts sent per embedding batch
    pub batch_size: usize,

    /// Endpoint override; falls back to `llm.ollamaUrl`
    pub endpoint: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            batch_size: 32,
            endpoint: None,
        }
    }
}

/// Directory loading, chunking and retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexSettings {
    /// Maximum characters per chunk
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,

    /// Allowed file extensions (with leading dot) or exact file names
    pub extensions: Vec<String>,

    /// Directory names that are never descended into
    pub ignored_dirs: Vec<String>,

    /// Files larger than this are skipped
    pub max_file_bytes: u64,

    /// Default number of chunks retrieved per query
    pub top_k: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            chunk_overlap: 200,
            extensions: [
                ".py", ".js", ".ts", ".go", ".rs", ".java", ".c", ".cpp", ".h", ".cs", ".html",
                ".css", ".md", ".txt", ".json", ".yaml", ".yml", ".sh", "Dockerfile",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ignored_dirs: [
                ".git",
                "__pycache__",
                "node_modules",
                "dist",
                "build",
                ".vscode",
                "venv",
                ".idea",
                "target",
                STATE_DIR,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_file_bytes: 1_048_576,
            top_k: 5,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSettings>,
    embedding: Option<EmbeddingSettings>,
    index: Option<IndexSettings>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            llm: LlmSettings::default(),
            embedding: EmbeddingSettings::default(),
            index: IndexSettings::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `ARCHIMIND_WORKSPACE`: Override workspace path
    /// - `ARCHIMIND_CONFIG`: Path to config file
    /// - `ARCHIMIND_PROVIDER`: LLM provider
    /// - `ARCHIMIND_MODEL`: Model identifier
    /// - `OLLAMA_URL`: Ollama server URL
    /// - `GEMINI_API_KEY`: API key for the Gemini provider
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Load configuration for an explicit workspace and/or config file.
    ///
    /// Explicit arguments take precedence over the corresponding
    /// environment variables.
    ///
    /// # Example
    /// ```no_run
    /// use archimind_core::config::AppConfig;
    ///
    /// let config = AppConfig::load_from(Some(".".into()), None).expect("Failed to load config");
    /// println!("Store: {:?}", config.store_dir());
    /// ```
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("ARCHIMIND_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("ARCHIMIND_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.state_dir().join("config.yaml"));

        if config_path.exists() {
            config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        config.apply_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Layer environment variables over the file configuration.
    ///
    /// Only variables that are set replace a value.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = var("ARCHIMIND_PROVIDER") {
            self.llm.provider = provider;
        }

        if let Some(model) = var("ARCHIMIND_MODEL") {
            self.llm.model = model;
        }

        if let Some(url) = var("OLLAMA_URL") {
            self.llm.ollama_url = url;
        }

        if let Some(key) = var("GEMINI_API_KEY") {
            self.llm.api_key = Some(key);
        }

        if let Some(level) = var("RUST_LOG") {
            self.log_level = Some(level);
        }

        if var("NO_COLOR").is_some() {
            self.no_color = true;
        }
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(llm) = config_file.llm {
            self.llm = llm;
        }

        if let Some(embedding) = config_file.embedding {
            self.embedding = embedding;
        }

        if let Some(index) = config_file.index {
            self.index = index;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.llm.provider = provider;
        }

        if let Some(model) = model {
            self.llm.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Path to the `.archimind` state directory.
    pub fn state_dir(&self) -> PathBuf {
        self.workspace.join(STATE_DIR)
    }

    /// Directory holding the persisted vector store.
    pub fn store_dir(&self) -> PathBuf {
        self.state_dir().join("store")
    }

    /// Path of the analysis status file.
    pub fn status_path(&self) -> PathBuf {
        self.state_dir().join("status.json")
    }

    /// Directory where repositories are cloned for analysis.
    pub fn repos_dir(&self) -> PathBuf {
        self.state_dir().join("repos")
    }

    /// Directory holding workspace prompt overrides.
    pub fn prompts_dir(&self) -> PathBuf {
        self.state_dir().join("prompts")
    }

    /// Ensure the state directory exists.
    pub fn ensure_state_dir(&self) -> AppResult<()> {
        let state_dir = self.state_dir();
        if !state_dir.exists() {
            std::fs::create_dir_all(&state_dir).map_err(|e| {
                AppError::Config(format!("Failed to create {} directory: {}", STATE_DIR, e))
            })?;
        }
        Ok(())
    }

    /// Endpoint used by the embedding provider.
    pub fn embedding_endpoint(&self) -> &str {
        self.embedding
            .endpoint
            .as_deref()
            .unwrap_or(&self.llm.ollama_url)
    }

    /// Validate the merged configuration.
    pub fn validate(&self) -> AppResult<()> {
        if !LLM_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.llm.provider,
                LLM_PROVIDERS.join(", ")
            )));
        }

        if !EMBEDDING_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if self.llm.provider == "gemini" && self.llm.api_key.is_none() {
            return Err(AppError::Config(
                "API key not found in environment variable: GEMINI_API_KEY".to_string(),
            ));
        }

        if self.index.chunk_size == 0 {
            return Err(AppError::Config("chunkSize must be greater than 0".to_string()));
        }

        if self.index.chunk_overlap >= self.index.chunk_size {
            return Err(AppError::Config(format!(
                "chunkOverlap ({}) must be smaller than chunkSize ({})",
                self.index.chunk_overlap, self.index.chunk_size
            )));
        }

        if self.embedding.dimensions == 0 || self.embedding.batch_size == 0 {
            return Err(AppError::Config(
                "Embedding dimensions and batchSize must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.embedding.model, "nomic-embed-text");
        assert_eq!(config.index.chunk_size, 2000);
        assert_eq!(config.index.chunk_overlap, 200);
        assert!(config.index.extensions.contains(&".rs".to_string()));
        assert!(!config.verbose);
    }

    #[test]
    fn test_state_paths() {
        let config = AppConfig::default();
        assert!(config.state_dir().ends_with(STATE_DIR));
        assert!(config.store_dir().ends_with("store"));
        assert!(config.status_path().ends_with("status.json"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            Some("gemini".to_string()),
            Some("gemini-2.5-pro".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.llm.provider, "gemini");
        assert_eq!(overridden.llm.model, "gemini-2.5-pro");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_merge_yaml_partial_sections() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "index:\n  chunkSize: 800\n  chunkOverlap: 80\nembedding:\n  provider: trigram\n  dimensions: 64\nlogging:\n  color: false\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.merge_yaml(&path).unwrap();

        assert_eq!(config.index.chunk_size, 800);
        assert_eq!(config.index.chunk_overlap, 80);
        // Unspecified fields keep their defaults
        assert_eq!(config.index.top_k, 5);
        assert_eq!(config.embedding.provider, "trigram");
        assert_eq!(config.embedding.dimensions, 64);
        assert_eq!(config.embedding.model, "nomic-embed-text");
        assert!(config.no_color);
    }

    #[test]
    fn test_env_overrides_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "llm:\n  provider: gemini\n  apiKey: from-yaml\nlogging:\n  level: warn\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.merge_yaml(&path).unwrap();
        config.apply_env(|key| match key {
            "RUST_LOG" => Some("debug".to_string()),
            _ => None,
        });

        // Unset variables keep the file's values
        assert_eq!(config.llm.api_key.as_deref(), Some("from-yaml"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.validate().is_ok());

        config.apply_env(|key| match key {
            "GEMINI_API_KEY" => Some("from-env".to_string()),
            _ => None,
        });
        assert_eq!(config.llm.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.llm.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_gemini_requires_key() {
        let mut config = AppConfig::default();
        config.llm.provider = "gemini".to_string();
        config.llm.api_key = None;
        assert!(config.validate().is_err());

        config.llm.api_key = Some("key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_overlap_smaller_than_size() {
        let mut config = AppConfig::default();
        config.index.chunk_overlap = config.index.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_embedding_endpoint_fallback() {
        let mut config = AppConfig::default();
        assert_eq!(config.embedding_endpoint(), "http://localhost:11434");

        config.embedding.endpoint = Some("http://embedder:11434".to_string());
        assert_eq!(config.embedding_endpoint(), "http://embedder:11434");
    }
}
