//! Error types for larder.

pub mod unified;

pub use unified::{ErrorCategory, ErrorCode, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all client operations.
///
/// Variants are distinguished by their fields, never by message text. Callers are
/// expected to match exhaustively.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("API error [{code}]: {message}")]
    Api {
        status: Option<u16>,
        code: String,
        message: String,
        provider_code: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Rate limited, retry after {retry_after_seconds}s: {message}")]
    RateLimit {
        message: String,
        retry_after_seconds: u64,
        provider_code: Option<String>,
    },

    #[error("Timeout after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

impl ClientError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Validation {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create a classified API error without provider detail.
    pub fn api(status: Option<u16>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.to_string(),
            message: message.into(),
            provider_code: None,
            source: None,
        }
    }

    /// Create an API error that wraps an underlying failure.
    pub fn api_with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Api {
            status: None,
            code: code.to_string(),
            message: message.into(),
            provider_code: None,
            source: Some(source.into()),
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::RateLimit { .. } => Some(429),
            _ => None,
        }
    }

    /// Provider or local classification code.
    pub fn code(&self) -> &str {
        match self {
            Self::Configuration(_) => ErrorCode::ConfigurationError.as_str(),
            Self::Validation { .. } => ErrorCode::ValidationError.as_str(),
            Self::Api { code, .. } => code,
            Self::RateLimit { .. } => ErrorCode::RateLimitExceeded.as_str(),
            Self::Timeout { .. } => ErrorCode::Timeout.as_str(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::RateLimit { .. } => ErrorCategory::RateLimit,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Api { status, code, .. } => match status {
                Some(401) => ErrorCategory::Authentication,
                Some(403) => ErrorCategory::Permission,
                Some(404) => ErrorCategory::NotFound,
                Some(429) => ErrorCategory::RateLimit,
                Some(500..=599) => ErrorCategory::Server,
                None if code == ErrorCode::NetworkError.as_str() => ErrorCategory::Network,
                _ => ErrorCategory::Api,
            },
        }
    }

    /// Whether a caller may reasonably retry the whole operation later.
    ///
    /// The transport has already spent its own retry budget by the time an
    /// error surfaces; this only informs user-level retry decisions.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication | ErrorCategory::Permission => {
                RecoverySuggestion::CheckCredentials
            }
            ErrorCategory::RateLimit => RecoverySuggestion::RetryLater,
            ErrorCategory::Network | ErrorCategory::Server => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Validation => RecoverySuggestion::CheckInput,
            ErrorCategory::NotFound => RecoverySuggestion::CheckModel,
            ErrorCategory::Api => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ClientError>;
