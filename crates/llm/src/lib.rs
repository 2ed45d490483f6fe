//! Language model integration for ArchiMind.
//!
//! Provides a provider-agnostic `LlmClient` trait used for code generation,
//! code review and documentation synthesis.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **Gemini**: Hosted Google model, requires `GEMINI_API_KEY`
//!
//! # Example
//! ```no_run
//! use archimind_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Write a binary search in Rust", "stable-code:3b");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod response;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GeminiClient, OllamaClient};
pub use response::{extract_code_block, extract_json_object};
