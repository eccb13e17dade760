//! Caller-side exponential backoff retry.
//!
//! The analysis core never retries. Callers that want retries wrap
//! [`crate::analyze`] with [`retry_with_backoff`] and decide which errors
//! are worth another attempt.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use tracing::warn;

const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 30;

/// How many attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl RetryPolicy {
    /// One attempt, no retries.
    pub fn single_attempt() -> Self {
        Self::with_retries(0)
    }

    /// `retries` additional attempts after the first, base 1s, max 30s.
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
            max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single_attempt()
    }
}

/// Retry an async operation with exponential backoff.
///
/// `attempt` is called up to `policy.max_attempts` times (at least once).
/// An error for which `should_retry` returns false is returned immediately;
/// otherwise the task sleeps for an exponentially increasing duration before
/// the next attempt. After the last attempt its error is returned as-is.
pub async fn retry_with_backoff<T, E, Fut, F, R>(
    policy: RetryPolicy,
    should_retry: R,
    mut attempt: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut backoff = ExponentialBackoff {
        initial_interval: policy.initial_interval,
        max_interval: policy.max_interval,
        max_elapsed_time: None,
        ..Default::default()
    };

    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;

        let err = match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if attempts >= max_attempts || !should_retry(&err) {
            return Err(err);
        }

        if let Some(wait_duration) = backoff.next_backoff() {
            warn!(
                "Attempt {}/{} failed: {}. Retrying in {:?}",
                attempts, max_attempts, err, wait_duration
            );
            tokio::time::sleep(wait_duration).await;
        }
    }
}
