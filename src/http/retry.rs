//! Fixed-delay retry for connection-level failures.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

use crate::error::ClientError;

/// Total number of attempts made for a request before giving up.
pub const MAX_ATTEMPTS: usize = 5;

/// Delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempt budget is spent.
    ///
    /// Only [`crate::error::TransportError::Connect`] is retried. Exhausting the budget
    /// returns the last connection failure.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T, ClientError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(ClientError::Transport(e)) if e.is_retryable() => {
                    if attempt >= self.max_attempts {
                        warn!(
                            "{}: giving up after {} attempts ({})",
                            operation_name, attempt, e
                        );
                        return Err(ClientError::Transport(e));
                    }
                    warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                        operation_name,
                        attempt,
                        self.max_attempts,
                        e,
                        self.delay.as_millis()
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                    return Err(e);
                }
            }
        }
    }
}
