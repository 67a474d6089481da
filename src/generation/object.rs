//! Structured output parsing.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::ClientError;

/// Characters of raw model output kept in parse error messages.
pub const SNIPPET_CHARS: usize = 200;

/// Parse structured content as untyped JSON.
pub fn parse_structured_value(content: &str, schema_name: &str) -> Result<Value, ClientError> {
    parse_structured(content, schema_name)
}

/// Parse structured content into `T`, reporting failures as validation errors
/// that name the schema and carry a bounded snippet of the raw content.
pub fn parse_structured<T: DeserializeOwned>(
    content: &str,
    schema_name: &str,
) -> Result<T, ClientError> {
    let json_text = strip_code_fences(content);
    serde_json::from_str(json_text).map_err(|e| {
        let snippet = snippet(content);
        ClientError::validation_with_details(
            format!(
                "Model response does not match the \"{schema_name}\" schema: {e}. \
                 Raw content starts with: {snippet}"
            ),
            json!({
                "schema": schema_name,
                "snippet": snippet,
                "parse_error": e.to_string(),
            }),
        )
    })
}

/// First [`SNIPPET_CHARS`] characters of `content`.
pub fn snippet(content: &str) -> String {
    content.chars().take(SNIPPET_CHARS).collect()
}

/// Strip markdown code fences from a JSON response.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let without_opening = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_opening
        .strip_suffix("```")
        .unwrap_or(without_opening)
        .trim()
}
