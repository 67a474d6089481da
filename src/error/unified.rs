//! Unified error classification and recovery.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Machine-readable error code attached to classified failures.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ConfigurationError,
    ValidationError,
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimitExceeded,
    ServiceUnavailable,
    ApiError,
    NetworkError,
    EmptyResponse,
    FetchModelsFailed,
    Timeout,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Authentication,
    Permission,
    NotFound,
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    RetryLater,
    CheckCredentials,
    CheckConfiguration,
    CheckInput,
    CheckModel,
    IncreaseTimeout,
    ContactSupport,
}
