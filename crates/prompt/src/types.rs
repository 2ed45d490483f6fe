//! Prompt types for ArchiMind.
//!
//! This module defines the domain entities for the prompt system.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Optional system message sent alongside the rendered template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Substituted for `{{context}}` when retrieval produced nothing
    #[serde(
        rename = "emptyContext",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub empty_context: Option<String>,

    /// Template string with Handlebars syntax
    pub template: String,

    /// Output specification
    #[serde(default)]
    pub output: PromptOutputSpec,
}

/// Output specification for the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptOutputSpec {
    /// Output format (e.g., "code", "markdown", "json")
    pub format: String,
}

impl Default for PromptOutputSpec {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
        }
    }
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Whether retrieved context was empty and the fallback was used
    #[serde(rename = "emptyContextUsed")]
    pub empty_context_used: bool,

    /// Template variables that were resolved
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: HashMap<String, String>,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        system: Option<String>,
        user: String,
        source_prompt_id: String,
        empty_context_used: bool,
        resolved_variables: HashMap<String, String>,
    ) -> Self {
        Self {
            system,
            user,
            metadata: BuiltPromptMetadata {
                source_prompt_id,
                empty_context_used,
                resolved_variables,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: code.generate
title: Generate
apiVersion: "1.0"
emptyContext: No context provided.
template: "{{context}}\n{{prompt}}"
output:
  format: code
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "code.generate");
        assert_eq!(def.api_version, "1.0");
        assert_eq!(def.empty_context.as_deref(), Some("No context provided."));
        assert!(def.system.is_none());
        assert_eq!(def.output.format, "code");
    }

    #[test]
    fn test_output_defaults_to_text() {
        let yaml = "id: a.b\ntitle: T\napiVersion: \"1.0\"\ntemplate: hi\n";
        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.output.format, "text");
    }

    #[test]
    fn test_built_prompt_metadata_serialization() {
        let built = BuiltPrompt::new(
            None,
            "user".to_string(),
            "code.review".to_string(),
            true,
            HashMap::new(),
        );

        let json = serde_json::to_value(&built).unwrap();
        assert_eq!(json["metadata"]["sourcePromptId"], "code.review");
        assert_eq!(json["metadata"]["emptyContextUsed"], true);
    }
}
