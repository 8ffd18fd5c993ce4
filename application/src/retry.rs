//! Backoff/retry policy for rate-limited generation services
//!
//! An explicit policy object composed around one async invocation, so the
//! backoff schedule is testable without exercising a network call.

use crate::ports::llm_client::ClientError;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Errors from a retried invocation
#[derive(Error, Debug)]
pub enum RetryError {
    /// The backoff delay reached its upper bound without a successful call
    #[error("Rate-limit retries exhausted after {attempts} attempts")]
    Exhausted { attempts: usize },

    /// Non-retryable client failure, propagated from the first occurrence
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Exponential backoff schedule for rate-limited calls
///
/// Starting at `base_delay`, the delay is multiplied by `factor` after each
/// rate-limited attempt. Attempts continue while the delay stays below
/// `max_delay`; once the next delay would cross the bound, the invocation
/// fails with [`RetryError::Exhausted`] instead of sleeping again.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    base_delay: Duration,
    factor: f64,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(3),
            factor: 1.5,
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn new(base_delay: Duration, factor: f64, max_delay: Duration) -> Self {
        assert!(factor > 1.0, "backoff factor must grow the delay");
        Self {
            base_delay,
            factor,
            max_delay,
        }
    }

    /// Run `op`, retrying on rate limits per the schedule.
    ///
    /// Non-rate-limit errors are returned immediately, untouched.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut delay = self.base_delay;
        let mut attempts = 0;
        loop {
            attempts += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_rate_limited() => {
                    if delay >= self.max_delay {
                        return Err(RetryError::Exhausted { attempts });
                    }
                    info!("Rate limited, backing off for {:.1}s", delay.as_secs_f64());
                    tokio::time::sleep(delay).await;
                    delay = delay.mul_f64(self.factor);
                }
                Err(error) => return Err(RetryError::Client(error)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(300), 1.5, Duration::from_secs(6))
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_rate_limits() {
        let calls = AtomicUsize::new(0);
        let result: Result<u32, _> = fast_policy()
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(ClientError::RateLimited)
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_exactly_when_next_delay_crosses_bound() {
        let calls = AtomicUsize::new(0);
        let result: Result<u32, _> = fast_policy()
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ClientError::RateLimited) }
            })
            .await;

        // Delays slept: 0.3 * 1.5^k for k = 0..=7 (5.06s is the last one
        // below the 6s bound); the attempt after the final sleep fails and
        // the policy gives up without sleeping 7.59s.
        match result {
            Err(RetryError::Exhausted { attempts }) => assert_eq!(attempts, 9),
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slept_delays_stay_below_bound() {
        let start = tokio::time::Instant::now();
        let _ = fast_policy()
            .run(|| async { Err::<u32, _>(ClientError::RateLimited) })
            .await;

        // Sum of the geometric series 0.3 * (1.5^8 - 1) / 0.5 ≈ 14.8s; a
        // single out-of-bound sleep would push this past 20s.
        let elapsed = start.elapsed();
        assert!(elapsed < Duration::from_secs(16), "slept too long: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_propagates_immediately() {
        let calls = AtomicUsize::new(0);
        let result: Result<u32, _> = fast_policy()
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ClientError::Provider("upstream 500".to_string())) }
            })
            .await;

        assert!(matches!(
            result,
            Err(RetryError::Client(ClientError::Provider(_)))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
