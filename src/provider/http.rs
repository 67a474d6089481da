//! HTTP client construction, provider headers, and response classification.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use serde_json::Value;

use crate::error::{ClientError, ErrorCode};

/// `Retry-After` assumed for a classified 429 when the header is unusable.
pub const DEFAULT_RATE_LIMIT_RETRY_AFTER_SECS: u64 = 60;

/// Build a reqwest client with a per-attempt timeout.
pub fn build_client(request_timeout: Duration) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(request_timeout)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| ClientError::configuration(format!("Failed to build HTTP client: {e}")))
}

/// Bearer auth, JSON content type, and the two identification headers.
pub fn provider_headers(api_key: &str, referer: &str, title: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    if let Ok(val) = HeaderValue::from_str(referer) {
        headers.insert("HTTP-Referer", val);
    }
    if let Ok(val) = HeaderValue::from_str(title) {
        headers.insert("X-Title", val);
    }
    headers
}

/// Parse `Retry-After` as an integer number of seconds.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

/// Best-effort message and code pulled from a provider error body.
#[derive(Debug, Default, PartialEq)]
struct ErrorBody {
    message: Option<String>,
    code: Option<String>,
}

fn parse_error_body(body: &str) -> ErrorBody {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return ErrorBody::default();
    };
    let nested = json.get("error");
    let message = nested
        .and_then(|e| e.get("message"))
        .and_then(value_to_string)
        .or_else(|| nested.filter(|e| e.is_string()).and_then(value_to_string))
        .or_else(|| json.get("message").and_then(value_to_string));
    let code = nested
        .and_then(|e| e.get("code"))
        .and_then(value_to_string)
        .or_else(|| json.get("code").and_then(value_to_string));
    ErrorBody { message, code }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn status_text(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}

/// Translate a failing HTTP response into the error taxonomy.
pub fn classify_response(status: u16, headers: &HeaderMap, body: &str) -> ClientError {
    let ErrorBody { message, code } = parse_error_body(body);
    let message = message.unwrap_or_else(|| status_text(status));

    let local_code = match status {
        401 => ErrorCode::Unauthorized,
        403 => ErrorCode::Forbidden,
        404 => ErrorCode::NotFound,
        429 => {
            return ClientError::RateLimit {
                message,
                retry_after_seconds: parse_retry_after(headers)
                    .unwrap_or(DEFAULT_RATE_LIMIT_RETRY_AFTER_SECS),
                provider_code: code,
            }
        }
        500 | 502 | 503 | 504 => ErrorCode::ServiceUnavailable,
        _ => {
            return ClientError::Api {
                status: Some(status),
                code: code.clone().unwrap_or_else(|| ErrorCode::ApiError.to_string()),
                message,
                provider_code: code,
                source: None,
            }
        }
    };

    ClientError::Api {
        status: Some(status),
        code: local_code.to_string(),
        message,
        provider_code: code,
        source: None,
    }
}
