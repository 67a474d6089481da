//! Retrying HTTP transport.
//!
//! Executes one logical request with bounded retries: network failures and
//! 5xx responses back off exponentially, 429 responses additionally honor the
//! server's `Retry-After` hint. Every other response, and the final attempt's
//! response, is handed back to the caller for classification.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::http::{classify_response, parse_retry_after};
use crate::error::{ClientError, ErrorCode};
use crate::util::retry::{AttemptOutcome, RetryPolicy, Sleeper, TokioSleeper};
use crate::util::timeout::{with_deadline, Deadline};

/// A request the transport may send more than once.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl TransportRequest {
    pub fn get(url: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers,
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, headers: HeaderMap, body: Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers,
            body: Some(body),
        }
    }
}

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Pass 2xx responses through; classify everything else.
    pub fn error_for_status(self) -> Result<Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(classify_response(self.status, &self.headers, &self.body))
        }
    }

    /// Decode the body of a successful response.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_str(&self.body).map_err(|e| {
            ClientError::api_with_source(
                ErrorCode::ApiError,
                format!("Unexpected response shape from provider: {e}"),
                e,
            )
        })
    }
}

/// HTTP transport with classified, bounded retries.
#[derive(Debug, Clone)]
pub struct RetryingTransport {
    client: reqwest::Client,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryingTransport {
    pub fn new(client: reqwest::Client, policy: RetryPolicy) -> Self {
        Self {
            client,
            policy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute `request`, retrying transient failures, within `deadline`.
    pub async fn execute(
        &self,
        request: &TransportRequest,
        deadline: Deadline,
    ) -> Result<TransportResponse, ClientError> {
        with_deadline(deadline, self.execute_with_retries(request, deadline)).await
    }

    async fn execute_with_retries(
        &self,
        request: &TransportRequest,
        deadline: Deadline,
    ) -> Result<TransportResponse, ClientError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(
                method = %request.method,
                url = %request.url,
                attempt,
                "Sending provider request"
            );

            let result = self.send_once(request).await;
            let outcome = match &result {
                Ok(response) => AttemptOutcome::from_status(
                    response.status,
                    parse_retry_after(&response.headers),
                ),
                Err(_) => AttemptOutcome::NetworkError,
            };

            if !self.policy.should_retry(attempt, &outcome) {
                return result.map_err(|e| {
                    let message = format!(
                        "Request to {} failed after {attempt} attempt(s): {e}",
                        request.url
                    );
                    ClientError::api_with_source(ErrorCode::NetworkError, message, e)
                });
            }

            let delay = self.policy.delay_for(attempt, &outcome);
            if !deadline.allows(delay) {
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Deadline leaves no room for another attempt"
                );
                return Err(deadline.timeout_error());
            }

            warn!(
                attempt,
                max_attempts = self.policy.max_attempts,
                delay_ms = delay.as_millis() as u64,
                outcome = ?outcome,
                "Retrying provider request"
            );
            self.sleeper.sleep(delay).await;
        }
    }

    async fn send_once(&self, request: &TransportRequest) -> Result<TransportResponse, reqwest::Error> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
