use crate::error::{LedgerError, Result};
use std::future::Future;
use std::time::Duration;

/// Bounded retry with exponential backoff for store conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(25),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay before the attempt following `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts run out. Exhaustion surfaces as `TransactionFailed`.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Err(e) if e.is_retryable() => {
                    if attempt >= self.max_attempts {
                        tracing::error!(%label, attempts = attempt, error = %e, "giving up after conflicts");
                        return Err(LedgerError::TransactionFailed(format!(
                            "{label}: {e} (after {attempt} attempts)"
                        )));
                    }
                    let delay = self.backoff(attempt);
                    tracing::warn!(%label, attempt, ?delay, error = %e, "retrying after conflict");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
