//! Operation deadlines.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::ClientError;

/// End-to-end budget for one logical operation, retries included.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }

    /// Whether waiting `delay` still leaves time for another attempt.
    pub fn allows(&self, delay: Duration) -> bool {
        delay < self.remaining()
    }

    pub fn timeout_error(&self) -> ClientError {
        ClientError::Timeout {
            elapsed_ms: self.elapsed().as_millis() as u64,
        }
    }
}

/// Run `future` under `deadline`, failing with [`ClientError::Timeout`] when it expires.
pub async fn with_deadline<T>(
    deadline: Deadline,
    future: impl Future<Output = Result<T, ClientError>>,
) -> Result<T, ClientError> {
    match tokio::time::timeout(deadline.remaining(), future).await {
        Ok(result) => result,
        Err(_) => Err(deadline.timeout_error()),
    }
}
