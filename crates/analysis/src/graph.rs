//! Mermaid diagram JSON parsing.
//!
//! Models are asked for `{"title", "description", "mermaid_code"}` objects
//! but often wrap them in fences or prose and emit Mermaid that browsers
//! refuse to render. `parse_graph` recovers the object and `sanitize_mermaid`
//! repairs the common breakages.

use archimind_llm::extract_json_object;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Maximum characters of raw model output kept for diagnostics.
const RAW_PREVIEW_CHARS: usize = 400;

static MULTILINE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*?)\n\s*([^\]]*?)\]").expect("valid regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static NODE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z][A-Za-z0-9_\-]*)\s*\[").expect("valid regex"));

static LETTER_BETWEEN_NODES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\s+[A-Za-z]\s+([-<])").expect("valid regex"));

/// Outcome of parsing one diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GraphResult {
    Ok {
        graph: Value,
    },
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw_preview: Option<String>,
    },
}

impl GraphResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, GraphResult::Ok { .. })
    }
}

/// Parse a model response holding a diagram JSON object.
///
/// `label` names the diagram in error messages (e.g. "HLD").
pub fn parse_graph(raw: &str, label: &str) -> GraphResult {
    if raw.trim().is_empty() {
        return GraphResult::Error {
            message: format!("No {} data returned.", label),
            raw_preview: None,
        };
    }

    let normalized = extract_json_object(raw);
    match serde_json::from_str::<Value>(&normalized) {
        Ok(Value::Object(mut object)) => {
            if let Some(Value::String(code)) = object.get("mermaid_code") {
                let sanitized = sanitize_mermaid(code);
                object.insert("mermaid_code".to_string(), Value::String(sanitized));
            }
            GraphResult::Ok {
                graph: Value::Object(object),
            }
        }
        Ok(_) => GraphResult::Error {
            message: format!("{} data was not a JSON object.", label),
            raw_preview: Some(preview(&normalized)),
        },
        Err(e) => {
            tracing::error!("Failed to parse {} JSON: {}", label, e);
            GraphResult::Error {
                message: format!("Failed to parse {} JSON.", label),
                raw_preview: Some(preview(raw)),
            }
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(RAW_PREVIEW_CHARS).collect()
}

/// Normalize Mermaid source so it renders client-side.
///
/// - line breaks inside `[...]` labels are collapsed to single spaces
/// - `snake_case` and `kebab-case` node ids become camelCase
/// - `activate`/`deactivate` lines are dropped
/// - stray single letters between a label and an arrow are removed
/// - trailing whitespace is trimmed from every line
pub fn sanitize_mermaid(code: &str) -> String {
    let code = MULTILINE_LABEL.replace_all(code, |caps: &Captures| {
        let joined = format!("{} {}", &caps[1], &caps[2]);
        format!("[{}]", WHITESPACE.replace_all(&joined, " ").trim())
    });

    let mut renames: HashMap<String, String> = HashMap::new();
    for caps in NODE_ID.captures_iter(&code) {
        let old_id = &caps[1];
        let new_id = to_camel_case(old_id);
        if new_id != old_id {
            renames.insert(old_id.to_string(), new_id);
        }
    }

    // Longest first so `api_gateway_v2` is not clobbered by `api_gateway`
    let mut old_ids: Vec<&String> = renames.keys().collect();
    old_ids.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut code = code.into_owned();
    for old_id in old_ids {
        let pattern = format!(r"\b{}\b", regex::escape(old_id));
        if let Ok(re) = Regex::new(&pattern) {
            code = re
                .replace_all(&code, regex::NoExpand(&renames[old_id]))
                .into_owned();
        }
    }

    code.lines()
        .filter(|line| {
            let lower = line.trim().to_lowercase();
            !(lower.starts_with("activate ") || lower.starts_with("deactivate "))
        })
        .map(|line| {
            LETTER_BETWEEN_NODES
                .replace_all(line, "] $1")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `api_gateway` / `api-gateway` → `apiGateway`; ids without separators are
/// returned unchanged.
fn to_camel_case(node_id: &str) -> String {
    let parts: Vec<&str> = node_id.split(['_', '-']).collect();
    if parts.len() < 2 {
        return node_id.to_string();
    }

    let mut camel = parts[0].to_lowercase();
    for part in parts[1..].iter().filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            camel.extend(first.to_uppercase());
            camel.push_str(&chars.as_str().to_lowercase());
        }
    }

    if !camel.starts_with(|c: char| c.is_alphabetic()) {
        camel.insert_str(0, "node");
    }
    camel
}
