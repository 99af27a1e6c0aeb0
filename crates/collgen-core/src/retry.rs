//! Retry strategy for score fetches.
//!
//! Waits between attempts go through a [`CancellationToken`], so an aborted job
//! never sits out a full back-off.

use std::time::Duration;

use thiserror::Error;

use crate::config::generation;
use crate::generator::CancellationToken;

/// Errors that can tell whether another attempt might succeed.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Why [`RetryStrategy::execute`] gave up.
#[derive(Debug, Error, PartialEq)]
pub enum RetryError<E> {
    #[error("cancelled")]
    Cancelled,
    /// Last error, after it was non-retryable or attempts ran out.
    #[error("{0}")]
    Failed(E),
}

/// Trait for defining retry strategies.
///
/// Implementations define how many attempts to make and how long to wait
/// between each attempt.
pub trait RetryStrategy {
    /// Maximum number of attempts, including the first.
    fn max_attempts(&self) -> u32;

    /// Delay after the given failed attempt (0-indexed).
    fn delay_for_attempt(&self, attempt: u32) -> Option<Duration>;

    /// Calls `f` until it succeeds, returns a non-retryable error, or
    /// `max_attempts()` is reached.
    ///
    /// `on_retry` runs before each wait with the failed attempt, its error and
    /// the delay. Cancellation is checked before every attempt and ends any
    /// wait early.
    fn execute<T, E, F, W>(
        &self,
        cancel: &CancellationToken,
        mut f: F,
        mut on_retry: W,
    ) -> Result<T, RetryError<E>>
    where
        E: Retryable,
        F: FnMut(u32) -> Result<T, E>,
        W: FnMut(u32, &E, Duration),
    {
        let max = self.max_attempts().max(1);
        let mut attempt = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(RetryError::Cancelled);
            }
            let err = match f(attempt) {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };
            if !err.is_retryable() || attempt + 1 >= max {
                return Err(RetryError::Failed(err));
            }

            let delay = self.delay_for_attempt(attempt).unwrap_or_default();
            on_retry(attempt, &err, delay);
            if cancel.wait_timeout(delay) {
                return Err(RetryError::Cancelled);
            }
            attempt += 1;
        }
    }
}

/// Fixed delay retry strategy.
///
/// Waits a constant duration between each attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    max_attempts: u32,
    delay: Duration,
}

impl FixedDelay {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelay {
    /// Five attempts, twenty seconds apart.
    fn default() -> Self {
        Self::new(generation::MAX_FETCH_ATTEMPTS, generation::FETCH_RETRY_DELAY)
    }
}

impl RetryStrategy for FixedDelay {
    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn delay_for_attempt(&self, _attempt: u32) -> Option<Duration> {
        Some(self.delay)
    }
}

/// Attempt once and return the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryStrategy for NoRetry {
    fn max_attempts(&self) -> u32 {
        1
    }

    fn delay_for_attempt(&self, _attempt: u32) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Busy,
        Broken,
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            *self == TestError::Busy
        }
    }

    fn short() -> FixedDelay {
        FixedDelay::new(3, Duration::from_millis(1))
    }

    #[test]
    fn test_default_fixed_delay() {
        let strategy = FixedDelay::default();
        assert_eq!(strategy.max_attempts(), 5);
        assert_eq!(strategy.delay_for_attempt(0), Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_succeeds_after_retryable_failures() {
        let token = CancellationToken::new();
        let mut retries = Vec::new();
        let result = short().execute(
            &token,
            |attempt| {
                if attempt < 2 {
                    Err(TestError::Busy)
                } else {
                    Ok(attempt)
                }
            },
            |attempt, _, _| retries.push(attempt),
        );
        assert_eq!(result, Ok(2));
        assert_eq!(retries, vec![0, 1]);
    }

    #[test]
    fn test_exhausted_returns_last_error() {
        let token = CancellationToken::new();
        let mut calls = 0;
        let result: Result<(), _> = short().execute(
            &token,
            |_| {
                calls += 1;
                Err(TestError::Busy)
            },
            |_, _, _| {},
        );
        assert_eq!(result, Err(RetryError::Failed(TestError::Busy)));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_non_retryable_stops_immediately() {
        let token = CancellationToken::new();
        let mut calls = 0;
        let result: Result<(), _> = short().execute(
            &token,
            |_| {
                calls += 1;
                Err(TestError::Broken)
            },
            |_, _, _| panic!("no retry expected"),
        );
        assert_eq!(result, Err(RetryError::Failed(TestError::Broken)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_no_retry_single_attempt() {
        let token = CancellationToken::new();
        let result: Result<(), _> = NoRetry.execute(&token, |_| Err(TestError::Busy), |_, _, _| {});
        assert_eq!(result, Err(RetryError::Failed(TestError::Busy)));
    }

    #[test]
    fn test_cancelled_before_first_attempt() {
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<(), RetryError<TestError>> =
            short().execute(&token, |_| panic!("must not run"), |_, _, _| {});
        assert_eq!(result, Err(RetryError::Cancelled));
    }

    #[test]
    fn test_cancel_interrupts_wait() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        let strategy = FixedDelay::new(5, Duration::from_secs(30));

        let start = Instant::now();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            canceller.cancel();
        });
        let result: Result<(), _> = strategy.execute(&token, |_| Err(TestError::Busy), |_, _, _| {});
        handle.join().unwrap();

        assert_eq!(result, Err(RetryError::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
