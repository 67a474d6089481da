//! Request and response bodies for the chat-completions and models endpoints.

use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, ModelInfo, StructuredResponseFormat, Usage};

/// Body of `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormatBody<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ResponseFormatBody<'a> {
    JsonSchema {
        json_schema: &'a StructuredResponseFormat,
    },
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<WireUsage>,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl From<WireUsage> for Usage {
    fn from(u: WireUsage) -> Self {
        Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        }
    }
}

/// Body of `GET /models`.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<WireModel>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireModel {
    pub id: String,
    pub name: Option<String>,
    pub pricing: Option<WirePricing>,
    pub context_length: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePricing {
    pub prompt: Option<Price>,
    pub completion: Option<Price>,
}

/// Providers send prices either as decimal strings or as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Price {
    Number(f64),
    Text(String),
}

impl Price {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Price::Number(n) => Some(*n),
            Price::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<WireModel> for ModelInfo {
    fn from(model: WireModel) -> Self {
        let (prompt_price, completion_price) = match &model.pricing {
            Some(p) => (
                p.prompt.as_ref().and_then(Price::as_f64),
                p.completion.as_ref().and_then(Price::as_f64),
            ),
            None => (None, None),
        };
        ModelInfo {
            name: model.name.unwrap_or_else(|| model.id.clone()),
            id: model.id,
            prompt_price,
            completion_price,
            context_length: model.context_length,
        }
    }
}
