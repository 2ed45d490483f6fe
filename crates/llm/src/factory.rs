//! LLM provider factory.
//!
//! Resolves the configured provider name into a concrete `LlmClient`.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, OllamaClient};
use archimind_core::config::LlmSettings;
use archimind_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client from the language model settings.
///
/// # Errors
/// Returns `AppError::Config` if:
/// - Provider is unknown
/// - A hosted provider is selected without an API key
pub fn create_client(settings: &LlmSettings) -> AppResult<Arc<dyn LlmClient>> {
    match settings.provider.to_lowercase().as_str() {
        "ollama" => Ok(Arc::new(OllamaClient::with_base_url(&settings.ollama_url))),
        "gemini" | "google" => {
            let api_key = settings.api_key.as_deref().ok_or_else(|| {
                AppError::Config("Gemini provider requires GEMINI_API_KEY".to_string())
            })?;
            Ok(Arc::new(GeminiClient::new(api_key)))
        }
        other => Err(AppError::Config(format!("Unknown provider: {}", other))),
    }
}
