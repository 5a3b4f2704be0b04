//! Bounded retry for optimistic read-modify-write operations.
//!
//! The store offers no compare-and-swap, so a mutator that loses a race
//! against a concurrent writer re-reads fresh state and tries again, up to a
//! bound. The combinator here is generic over the attempted operation.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;

/// Bounds for a retried operation
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts before giving up
    pub max_attempts: u32,
    /// Pause between contended attempts
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }
}

/// Outcome of a single attempt of a retried operation
#[derive(Debug)]
pub enum Attempt<T, E> {
    /// The operation completed; stop
    Done(T),
    /// The attempt lost a race against a concurrent writer; retry on fresh state
    Contended,
    /// The operation failed in a way another attempt cannot fix; stop
    Failed(E),
}

/// Why a retried operation did not produce a value
#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} contended attempts")]
    Exhausted { attempts: u32 },
    #[error("{0}")]
    Inner(E),
}

/// Run an attempt closure until it completes, fails, or the policy is exhausted
///
/// The closure receives the 1-based attempt number. `backoff` is slept only
/// between attempts, never after the last one.
pub async fn with_retries<T, E, F, Fut>(
    policy: RetryPolicy,
    mut attempt: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Attempt<T, E>>,
{
    for n in 1..=policy.max_attempts {
        match attempt(n).await {
            Attempt::Done(value) => return Ok(value),
            Attempt::Failed(err) => return Err(RetryError::Inner(err)),
            Attempt::Contended => {
                if n < policy.max_attempts {
                    sleep(policy.backoff).await;
                }
            }
        }
    }

    Err(RetryError::Exhausted {
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(25))
    }

    #[tokio::test]
    async fn test_first_attempt_done() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, RetryError<String>> = with_retries(policy(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Attempt::Done(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_contended_then_done_retries_on_fresh_attempt() {
        let result: Result<u32, RetryError<String>> = with_retries(policy(), |n| async move {
            if n < 3 {
                Attempt::Contended
            } else {
                Attempt::Done(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_failure_stops_immediately() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, RetryError<String>> = with_retries(policy(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Attempt::Failed("nope".to_string()) }
        })
        .await;

        assert!(matches!(result, Err(RetryError::Inner(msg)) if msg == "nope"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_contention_exhausts() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, RetryError<String>> = with_retries(policy(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Attempt::Contended }
        })
        .await;

        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 3 })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_between_attempts_only() {
        let start = tokio::time::Instant::now();

        let _: Result<u32, RetryError<String>> =
            with_retries(policy(), |_| async { Attempt::Contended }).await;

        // Two pauses for three attempts
        assert_eq!(start.elapsed(), Duration::from_millis(50));
    }
}
