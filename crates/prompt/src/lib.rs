//! Prompt system for ArchiMind.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions, built in and overridable per workspace
//! - Handlebars template rendering
//! - Retrieved context injection with a fallback for empty retrievals

pub mod builder;
mod builtin;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{list_prompts, load_prompt};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};

/// Prompt used for code generation from `practices` context.
pub const CODE_GENERATE: &str = "code.generate";

/// Prompt used for code review against `bad_practices` context.
pub const CODE_REVIEW: &str = "code.review";

/// Prompt producing the Markdown architecture handbook.
pub const DOCS_HANDBOOK: &str = "docs.handbook";

/// Prompt producing the high-level design diagram JSON.
pub const DOCS_HLD: &str = "docs.hld";

/// Prompt producing the low-level design diagram JSON.
pub const DOCS_LLD: &str = "docs.lld";

/// Prompt producing a short conversational repository summary.
pub const DOCS_SUMMARY: &str = "docs.summary";

/// Prompt answering a question about an indexed repository.
pub const REPO_ASK: &str = "repo.ask";
