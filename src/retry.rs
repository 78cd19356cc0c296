//! Retry Policy Module
//!
//! Bounded retries with linear backoff around a single remote operation.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::error::{ConfigurationError, FetchError, TransportError};

// == Retry Policy ==
/// How many times an operation is attempted and how long to wait in between.
///
/// The delay before retry `n` (1-based, counting failed attempts) is
/// `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    // == Constructor ==
    /// Creates a policy, rejecting `max_attempts == 0` up front.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Result<Self, ConfigurationError> {
        if max_attempts == 0 {
            return Err(ConfigurationError::ZeroAttempts);
        }

        Ok(Self {
            max_attempts,
            base_delay,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    // == Delay For ==
    /// Backoff to sleep after the given failed attempt number.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    // == Execute ==
    /// Runs `operation` until it succeeds or the attempts are used up.
    ///
    /// Sleeping between attempts uses the tokio timer, so other in-flight
    /// fetches keep making progress. On exhaustion the last error is returned.
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut state = RetryState::new(self);

        loop {
            state.attempt += 1;

            match operation().await {
                Ok(value) => {
                    if state.attempt > 1 {
                        debug!(attempt = state.attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if state.exhausted() => {
                    error!(
                        error = %err,
                        attempts = state.attempt,
                        "Operation failed after all retries"
                    );
                    return Err(err);
                }
                Err(err) => {
                    let delay = state.next_delay();
                    warn!(
                        error = %err,
                        attempt = state.attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Operation failed, will retry"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

// == Retry State ==
/// Bookkeeping for one `execute` call; dropped when the call returns.
#[derive(Debug, Clone, Copy)]
pub struct RetryState {
    /// Attempts started so far
    pub attempt: u32,
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryState {
    fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempt: 0,
            max_attempts: policy.max_attempts,
            base_delay: policy.base_delay,
        }
    }

    fn exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    fn next_delay(&self) -> Duration {
        self.base_delay.saturating_mul(self.attempt)
    }
}

// == Execute ==
/// One-shot form of [`RetryPolicy::execute`].
///
/// Invalid parameters yield [`FetchError::Configuration`] without invoking
/// `operation`; exhaustion yields [`FetchError::Unavailable`].
pub async fn execute<T, F, Fut>(
    operation: F,
    max_attempts: u32,
    base_delay: Duration,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let policy = RetryPolicy::new(max_attempts, base_delay)?;
    policy.execute(operation).await.map_err(FetchError::Unavailable)
}
