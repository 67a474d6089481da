//! Retry policy: deterministic exponential backoff with `Retry-After` support.
//!
//! The policy only decides; sleeping goes through a [`Sleeper`] so tests can
//! observe requested waits without real time passing.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

/// Classified outcome of a single transport attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The request never produced a response.
    NetworkError,
    /// HTTP 429, with the parsed `Retry-After` hint in seconds.
    RateLimited { retry_after_secs: Option<u64> },
    /// HTTP 5xx.
    ServerError { status: u16 },
    /// Any other status; never retried.
    Completed { status: u16 },
}

impl AttemptOutcome {
    pub fn from_status(status: u16, retry_after_secs: Option<u64>) -> Self {
        match status {
            429 => Self::RateLimited { retry_after_secs },
            500..=u16::MAX => Self::ServerError { status },
            _ => Self::Completed { status },
        }
    }

    fn is_transient(&self) -> bool {
        !matches!(self, Self::Completed { .. })
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Backoff unit; attempt `n` (1-based) waits `base_delay * 2^n`.
    pub base_delay: Duration,
    /// Wait used for a 429 without a usable `Retry-After` header.
    pub default_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            default_retry_after: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Whether attempt `attempt` (1-based) should be followed by another.
    pub fn should_retry(&self, attempt: u32, outcome: &AttemptOutcome) -> bool {
        attempt < self.max_attempts && outcome.is_transient()
    }

    /// Wait before the attempt following `attempt`.
    pub fn delay_for(&self, attempt: u32, outcome: &AttemptOutcome) -> Duration {
        let backoff = self.backoff(attempt);
        match outcome {
            AttemptOutcome::RateLimited { retry_after_secs } => {
                let hint = retry_after_secs
                    .map(Duration::from_secs)
                    .unwrap_or(self.default_retry_after);
                backoff.min(hint)
            }
            _ => backoff,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Cooperative wait used between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync + fmt::Debug {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
