//! Retry policy and executor for one network round.
//!
//! Retries wrap a single vendor round-trip, never the whole tool loop —
//! executed tool side effects are not replayed. Only errors the adapter
//! marked retryable ([`LlmError::is_retryable`]) trigger another attempt;
//! everything else propagates immediately.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::LlmError;

/// Exponential-backoff retry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. `0` behaves as `1`.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_backoff: Duration,
    /// Multiplier applied to the delay after each failed attempt. A value
    /// that does not produce a valid delay (negative, NaN) leaves the
    /// delay unchanged.
    pub backoff_multiplier: f64,
    /// Upper bound on the delay between attempts.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            backoff_multiplier: 2.0,
            max_backoff: Duration::from_secs(10),
        }
    }
}

/// Runs operations under a [`RetryPolicy`].
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Creates an executor with the given policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Runs `operation` until it succeeds, fails non-retryably, or the
    /// attempt budget is spent. Exhaustion wraps the final error in
    /// [`LlmError::RetryExhausted`].
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let attempts = self.policy.max_attempts.max(1);
        let mut backoff = self.policy.initial_backoff;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() => {
                    if attempt >= attempts {
                        return Err(LlmError::RetryExhausted {
                            attempts,
                            last_error: Box::new(err),
                        });
                    }
                    warn!(attempt, error = %err, "retryable request failure, backing off");
                    tokio::time::sleep(backoff).await;
                    // Duration::from_secs_f64 panics on negative or NaN
                    // input; a policy must never panic the executor.
                    let next = (backoff.as_secs_f64() * self.policy.backoff_multiplier)
                        .min(self.policy.max_backoff.as_secs_f64());
                    if let Ok(delay) = Duration::try_from_secs_f64(next) {
                        backoff = delay;
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}
