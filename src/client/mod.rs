//! Completion client: prompt construction, structured output, retrying
//! transport, and response parsing behind three operations.

mod models;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::json;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ErrorCode};
use crate::generation::object::{parse_structured, parse_structured_value};
use crate::generation::recipe::{validate_recipe_input, RecipeGenerator};
use crate::generation::schema::{recipe_response_format, RECIPE_SCHEMA_NAME};
use crate::prompt::build_recipe_prompt;
use crate::provider::http::{build_client, provider_headers};
use crate::provider::wire::{ChatCompletionRequest, ChatCompletionResponse, ResponseFormatBody};
use crate::provider::{RetryingTransport, TransportRequest};
use crate::types::{
    ChatMessage, ChatOptions, ChatResponse, GenerateRecipeInput, ModelParams, RecipeOutput,
    DEFAULT_CHAT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use crate::util::retry::{RetryPolicy, Sleeper};
use crate::util::timeout::Deadline;

/// Completion budget for recipe generation.
pub const DEFAULT_RECIPE_MAX_TOKENS: u32 = 1500;

const CHAT_DEFAULTS: ModelParams = ModelParams {
    temperature: Some(DEFAULT_TEMPERATURE),
    max_tokens: Some(DEFAULT_CHAT_MAX_TOKENS),
    top_p: None,
};

const RECIPE_DEFAULTS: ModelParams = ModelParams {
    temperature: Some(DEFAULT_TEMPERATURE),
    max_tokens: Some(DEFAULT_RECIPE_MAX_TOKENS),
    top_p: None,
};

/// Client for an OpenAI-compatible chat-completions provider.
///
/// Holds only immutable configuration; clone it or share it behind an `Arc`
/// to serve concurrent callers.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    config: Arc<ClientConfig>,
    transport: RetryingTransport,
    headers: HeaderMap,
}

impl CompletionClient {
    /// Validate `config` and build the client. A blank API key fails here,
    /// before any request can be attempted.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let http = build_client(config.request_timeout)?;
        let policy = RetryPolicy::default().with_max_attempts(config.max_retries);
        let headers = provider_headers(&config.api_key, &config.referer, &config.app_title);
        Ok(Self {
            transport: RetryingTransport::new(http, policy),
            headers,
            config: Arc::new(config),
        })
    }

    /// Build from `OPENROUTER_*` / `LARDER_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Replace the sleeper used between retries.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.transport = self.transport.with_sleeper(sleeper);
        self
    }

    /// Replace the retry policy. `max_retries` from the config is not consulted afterwards.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.transport = self.transport.with_policy(policy);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `messages` and return the first choice.
    ///
    /// Temperature defaults to 0.7 and max_tokens to 1000. When
    /// `options.response_format` is set the content is parsed as JSON eagerly.
    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<ChatResponse, ClientError> {
        self.complete(messages, options, CHAT_DEFAULTS).await
    }

    /// Generate a recipe from ingredients and optional preferences.
    pub async fn generate_recipe(
        &self,
        input: &GenerateRecipeInput,
    ) -> Result<RecipeOutput, ClientError> {
        validate_recipe_input(input)?;

        let prompt = build_recipe_prompt(&input.ingredients, input.preferences.as_ref());
        let options = ChatOptions {
            model: input.model.clone(),
            params: input.params,
            response_format: Some(recipe_response_format()),
        };

        let response = self
            .complete(&prompt.into_messages(), options, RECIPE_DEFAULTS)
            .await?;
        let recipe: RecipeOutput = parse_structured(&response.content, RECIPE_SCHEMA_NAME)?;

        debug!(
            user_id = %input.user_id,
            model = response.model.as_deref().unwrap_or_default(),
            title = %recipe.title,
            "Generated recipe"
        );
        Ok(recipe)
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: ChatOptions,
        defaults: ModelParams,
    ) -> Result<ChatResponse, ClientError> {
        validate_messages(messages)?;
        let params = options.params.unwrap_or_default();
        params.validate()?;
        let params = params.or(defaults);

        let model = options
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.config.default_model);

        let body = ChatCompletionRequest {
            model,
            messages,
            temperature: params.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: params.max_tokens.unwrap_or(DEFAULT_CHAT_MAX_TOKENS),
            top_p: params.top_p,
            response_format: options
                .response_format
                .as_ref()
                .map(|format| ResponseFormatBody::JsonSchema {
                    json_schema: format,
                }),
        };
        let body = serde_json::to_value(&body).map_err(|e| {
            ClientError::api_with_source(
                ErrorCode::ApiError,
                format!("Failed to encode chat request: {e}"),
                e,
            )
        })?;

        debug!(
            model,
            messages = messages.len(),
            structured = options.response_format.is_some(),
            "chat_completion"
        );

        let request = TransportRequest::post_json(
            self.config.endpoint("chat/completions"),
            self.headers.clone(),
            body,
        );
        let deadline = Deadline::after(self.config.operation_timeout);
        let response = self
            .transport
            .execute(&request, deadline)
            .await?
            .error_for_status()?;
        let parsed: ChatCompletionResponse = response.json()?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ClientError::api(
                Some(response.status),
                ErrorCode::EmptyResponse,
                "Provider returned no choices",
            )
        })?;
        let content = choice.message.content.unwrap_or_default();

        let structured = match &options.response_format {
            Some(format) => Some(parse_structured_value(&content, &format.name)?),
            None => None,
        };

        Ok(ChatResponse {
            content,
            structured,
            usage: parsed.usage.map(Into::into),
            model: parsed.model,
        })
    }
}

#[async_trait]
impl RecipeGenerator for CompletionClient {
    async fn generate_recipe(
        &self,
        input: &GenerateRecipeInput,
    ) -> Result<RecipeOutput, ClientError> {
        CompletionClient::generate_recipe(self, input).await
    }
}

fn validate_messages(messages: &[ChatMessage]) -> Result<(), ClientError> {
    if messages.is_empty() {
        return Err(ClientError::validation("At least one message is required"));
    }
    for (index, message) in messages.iter().enumerate() {
        message.validate().map_err(|e| match e {
            ClientError::Validation { message, .. } => {
                ClientError::validation_with_details(message, json!({ "index": index }))
            }
            other => other,
        })?;
    }
    Ok(())
}
