//! Helpers for pulling structured payloads out of free-form model output.

/// Longest first line inside a fence that is still treated as a language tag.
const MAX_LANGUAGE_TAG_LEN: usize = 15;

/// Extract the body of the first fenced code block.
///
/// A short first line (e.g. `python`, `rust`) is treated as the fence's
/// language tag and dropped. Without a complete fence the trimmed response is
/// returned unchanged.
pub fn extract_code_block(response: &str) -> String {
    let Some(start) = response.find("```") else {
        return response.trim().to_string();
    };
    let after_open = &response[start + 3..];
    let Some(end) = after_open.find("```") else {
        return response.trim().to_string();
    };

    let content = after_open[..end].trim();
    if let Some(newline) = content.find('\n') {
        let first_line = content[..newline].trim();
        if !first_line.is_empty() && first_line.len() < MAX_LANGUAGE_TAG_LEN {
            return content[newline + 1..].trim().to_string();
        }
    }

    content.to_string()
}

/// Strip Markdown fences and cut the text down to its outermost JSON object.
///
/// Returns an empty string for empty input. The result is not validated;
/// callers parse it and handle errors themselves.
pub fn extract_json_object(raw: &str) -> String {
    let mut cleaned = raw.trim();
    if cleaned.is_empty() {
        return String::new();
    }

    if cleaned.starts_with("```") {
        cleaned = cleaned.trim_start_matches('`');
        cleaned = cleaned.strip_prefix("json").unwrap_or(cleaned).trim();
        cleaned = cleaned.trim_end_matches('`').trim();
    }

    if !cleaned.starts_with('{') {
        if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
            if end > start {
                cleaned = &cleaned[start..=end];
            }
        }
    }

    cleaned.to_string()
}
