//! Client configuration (layered: code > env > config file defaults).

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ClientError;
use crate::provider::{DEFAULT_APP_TITLE, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_REFERER};

/// Default number of attempts per logical request.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default timeout for a single HTTP attempt.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// Default end-to-end budget for one operation, retries and backoff included.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Immutable settings for a [`crate::client::CompletionClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub default_model: String,
    /// Total attempts per request, first attempt included.
    pub max_retries: u32,
    pub request_timeout: Duration,
    pub operation_timeout: Duration,
    pub referer: String,
    pub app_title: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("max_retries", &self.max_retries)
            .field("request_timeout", &self.request_timeout)
            .field("operation_timeout", &self.operation_timeout)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .finish()
    }
}

/// On-disk TOML shape. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    base_url: Option<String>,
    default_model: Option<String>,
    max_retries: Option<u32>,
    request_timeout_secs: Option<u64>,
    operation_timeout_secs: Option<u64>,
    referer: Option<String>,
    app_title: Option<String>,
}

impl ClientConfig {
    /// Config with the given key and all other settings at their defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            referer: DEFAULT_REFERER.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn with_app_identity(mut self, referer: impl Into<String>, title: impl Into<String>) -> Self {
        self.referer = referer.into();
        self.app_title = title.into();
        self
    }

    /// Load from environment variables, reading `.env` if present.
    ///
    /// `OPENROUTER_API_KEY`, `OPENROUTER_BASE_URL`, `OPENROUTER_MODEL`,
    /// `LARDER_MAX_RETRIES`, `LARDER_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ClientError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (the environment, in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let mut config = Self::new(lookup("OPENROUTER_API_KEY").unwrap_or_default());
        if let Some(url) = lookup("OPENROUTER_BASE_URL") {
            config.base_url = url;
        }
        if let Some(model) = lookup("OPENROUTER_MODEL") {
            config.default_model = model;
        }
        if let Some(raw) = lookup("LARDER_MAX_RETRIES") {
            config.max_retries = parse_number("LARDER_MAX_RETRIES", &raw)?;
        }
        if let Some(raw) = lookup("LARDER_TIMEOUT_SECS") {
            config.operation_timeout = Duration::from_secs(parse_number("LARDER_TIMEOUT_SECS", &raw)?);
        }
        Ok(config)
    }

    /// Parse a TOML document; unset keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ClientError> {
        let file: FileConfig = toml::from_str(raw)
            .map_err(|e| ClientError::configuration(format!("Invalid config file: {e}")))?;

        let mut config = Self::new(file.api_key.unwrap_or_default());
        if let Some(url) = file.base_url {
            config.base_url = url;
        }
        if let Some(model) = file.default_model {
            config.default_model = model;
        }
        if let Some(retries) = file.max_retries {
            config.max_retries = retries;
        }
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.operation_timeout_secs {
            config.operation_timeout = Duration::from_secs(secs);
        }
        if let Some(referer) = file.referer {
            config.referer = referer;
        }
        if let Some(title) = file.app_title {
            config.app_title = title;
        }
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ClientError::configuration(format!("Cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Reject configurations that could never make a successful call.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.api_key.trim().is_empty() {
            return Err(ClientError::configuration("API key is required"));
        }
        if self.default_model.trim().is_empty() {
            return Err(ClientError::configuration("Default model cannot be empty"));
        }
        if self.max_retries == 0 {
            return Err(ClientError::configuration("max_retries must be at least 1"));
        }
        if self.operation_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(ClientError::configuration("Timeouts must be non-zero"));
        }
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            ClientError::configuration(format!("Invalid base URL '{}': {e}", self.base_url))
        })?;
        Ok(())
    }

    /// Base URL without a trailing slash, ready for path joining.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ClientError> {
    raw.trim()
        .parse()
        .map_err(|_| ClientError::configuration(format!("{name} must be a number, got '{raw}'")))
}
