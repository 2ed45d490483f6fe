//! Prompt-driven text generation.

use archimind_core::config::LlmSettings;
use archimind_core::AppResult;
use archimind_llm::{LlmClient, LlmRequest};
use archimind_prompt::{build_prompt, load_prompt};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Renders a named prompt and sends it to the language model.
#[derive(Clone)]
pub struct Generator {
    client: Arc<dyn LlmClient>,
    settings: LlmSettings,
    prompts_dir: PathBuf,
}

impl Generator {
    /// `prompts_dir` holds optional workspace overrides of the built-in prompts.
    pub fn new(client: Arc<dyn LlmClient>, settings: &LlmSettings, prompts_dir: PathBuf) -> Self {
        Self {
            client,
            settings: settings.clone(),
            prompts_dir,
        }
    }

    /// Render `prompt_id` with `variables` and return the model's reply.
    pub async fn run(&self, prompt_id: &str, variables: &[(&str, &str)]) -> AppResult<String> {
        let definition = load_prompt(&self.prompts_dir, prompt_id)?;
        let variables: HashMap<String, String> = variables
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let built = build_prompt(&definition, variables)?;

        let mut request = LlmRequest::new(built.user, &self.settings.model)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        tracing::debug!(
            prompt = prompt_id,
            provider = self.client.provider_name(),
            model = %self.settings.model,
            "Running prompt"
        );

        let response = self.client.complete(&request).await?;
        tracing::debug!(
            prompt = prompt_id,
            tokens = response.usage.total_tokens,
            "Prompt completed"
        );

        Ok(response.content)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use archimind_core::AppError;
    use archimind_llm::{LlmResponse, LlmUsage};
    use std::sync::Mutex;

    /// Records every request and answers with a fixed reply.
    pub(crate) struct RecordingClient {
        pub reply: String,
        pub requests: Mutex<Vec<LlmRequest>>,
    }

    impl RecordingClient {
        pub(crate) fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn prompts(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.prompt.clone())
                .collect()
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for RecordingClient {
        fn provider_name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            self.requests.lock().unwrap().push(request.clone());
            if self.reply == "!fail" {
                return Err(AppError::Llm("model unavailable".to_string()));
            }
            Ok(LlmResponse {
                content: self.reply.clone(),
                model: request.model.clone(),
                usage: LlmUsage::new(1, 1),
            })
        }
    }

    #[tokio::test]
    async fn test_run_renders_prompt_and_settings() {
        let temp = tempfile::TempDir::new().unwrap();
        let client = RecordingClient::new("answer");
        let generator = Generator::new(client.clone(), &LlmSettings::default(), temp.path().into());

        let reply = generator
            .run(
                archimind_prompt::CODE_GENERATE,
                &[("prompt", "add two numbers"), ("context", "")],
            )
            .await
            .unwrap();

        assert_eq!(reply, "answer");
        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[0].model, "stable-code:3b");
        assert_eq!(requests[0].max_tokens, Some(4000));
        assert!(requests[0].prompt.contains("User Request: add two numbers"));
        assert!(requests[0].prompt.contains("No context provided."));
    }

    #[tokio::test]
    async fn test_run_propagates_llm_errors() {
        let temp = tempfile::TempDir::new().unwrap();
        let generator = Generator::new(
            RecordingClient::new("!fail"),
            &LlmSettings::default(),
            temp.path().into(),
        );

        let result = generator.run(archimind_prompt::CODE_REVIEW, &[]).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
