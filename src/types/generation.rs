//! Generation parameters, structured output format, and chat results.

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::provider::schema::close_object_schemas;

use super::usage::Usage;

/// Default sampling temperature applied when a call does not set one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Default completion budget for plain chat calls.
pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 1000;

/// Sampling parameters. Unset fields fall back to per-operation defaults.
#[derive(Debug, Clone, Copy, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct ModelParams {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
}

impl ModelParams {
    /// Check ranges: temperature in [0, 2], top_p in [0, 1], max_tokens positive.
    pub fn validate(&self) -> Result<(), ClientError> {
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ClientError::validation(format!(
                    "temperature must be between 0 and 2, got {t}"
                )));
            }
        }
        if let Some(p) = self.top_p {
            if !(0.0..=1.0).contains(&p) {
                return Err(ClientError::validation(format!(
                    "top_p must be between 0 and 1, got {p}"
                )));
            }
        }
        if self.max_tokens == Some(0) {
            return Err(ClientError::validation("max_tokens must be positive"));
        }
        Ok(())
    }

    /// Fill unset fields from `defaults`.
    pub fn or(self, defaults: ModelParams) -> ModelParams {
        ModelParams {
            temperature: self.temperature.or(defaults.temperature),
            max_tokens: self.max_tokens.or(defaults.max_tokens),
            top_p: self.top_p.or(defaults.top_p),
        }
    }
}

/// A JSON Schema the provider must constrain its answer to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredResponseFormat {
    pub name: String,
    pub strict: bool,
    pub schema: serde_json::Value,
}

impl StructuredResponseFormat {
    /// Strict JSON Schema format. Object schemas without an explicit
    /// `additionalProperties` are closed.
    pub fn json_schema(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            strict: true,
            schema: close_object_schemas(&schema),
        }
    }
}

/// Per-call options for `chat_completion`.
#[derive(Debug, Clone, Builder, Default)]
pub struct ChatOptions {
    #[builder(into)]
    pub model: Option<String>,
    pub params: Option<ModelParams>,
    pub response_format: Option<StructuredResponseFormat>,
}

/// Result of a chat completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub content: String,
    /// Parsed JSON content, present when a structured format was requested.
    pub structured: Option<serde_json::Value>,
    pub usage: Option<Usage>,
    pub model: Option<String>,
}
