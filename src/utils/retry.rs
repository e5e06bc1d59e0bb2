//! Bounded retry with a fixed backoff.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio_retry::strategy::FixedInterval;

/// How often to try an action and how long to wait in between.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, initial attempt included. Zero is treated as one.
    pub max_attempts: usize,
    /// Fixed delay between attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy with `max_attempts` attempts spaced `backoff` apart.
    pub fn fixed(max_attempts: usize, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Delays between attempts; `max_attempts - 1` of them.
    fn strategy(&self) -> impl Iterator<Item = Duration> {
        FixedInterval::new(self.backoff).take(self.max_attempts.max(1) - 1)
    }
}

/// Failure of the final attempt, with the number of attempts made.
#[derive(Debug)]
pub struct RetryError<E> {
    /// Attempts made, initial attempt included
    pub attempts: usize,
    /// Error returned by the last attempt
    pub last: E,
}

/// Runs `action` until it succeeds or the policy's attempts are used up.
///
/// Every failed attempt is logged at `warn` with `what` as the subject. The
/// result is returned as a value; nothing is retried by unwinding.
///
/// # Arguments
///
/// * `policy` - Attempt count and backoff
/// * `what` - Description of the action for log lines (e.g. the URL)
/// * `action` - Produces one attempt's future each time it is called
///
/// # Errors
///
/// Returns `RetryError` carrying the last attempt's error once every attempt failed.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    what: &str,
    mut action: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0usize;

    let result = tokio_retry::Retry::spawn(policy.strategy(), || {
        attempts += 1;
        let attempt = attempts;
        let fut = action();
        async move {
            fut.await.map_err(|e| {
                log::warn!(
                    "Attempt {}/{} for {} failed: {}",
                    attempt,
                    max_attempts,
                    what,
                    e
                );
                e
            })
        }
    })
    .await;

    result.map_err(|last| RetryError { attempts, last })
}
