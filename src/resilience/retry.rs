//! Retry with capped exponential backoff for transient upstream failures.

use crate::errors::{DataForSeoError, DataForSeoResult};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Backoff schedule
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub base_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Growth factor between consecutive delays
    pub multiplier: f64,
    /// Randomize each delay within `[delay / 2, delay]`
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Three attempts, one second base delay, doubling, capped at thirty seconds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total number of attempts
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the base delay
    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the maximum delay
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the growth factor
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Toggle randomized delays
    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before the attempt following failed attempt `attempt` (1-based),
    /// without jitter: `min(base * multiplier^(attempt-1), max)`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let delay_secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);

        if !delay_secs.is_finite() || delay_secs >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(delay_secs.max(0.0))
        }
    }

    /// Delay actually slept, with jitter applied when enabled
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay = self.backoff(attempt);
        if !self.jitter || delay.is_zero() {
            return delay;
        }

        let half = delay / 2;
        half + rand::thread_rng().gen_range(Duration::ZERO..=delay - half)
    }
}

/// What a [`RetryHook`] sees before each backoff sleep
#[derive(Debug, Clone)]
pub struct RetryContext {
    /// Attempt that just failed (1-based)
    pub attempt: u32,
    /// Attempt budget, including the first call
    pub max_attempts: u32,
    /// The error from the failed attempt
    pub error: DataForSeoError,
    /// Sleep that follows this notification
    pub next_delay: Duration,
}

/// Observer notified before each backoff sleep.
///
/// Hooks cannot change control flow.
pub trait RetryHook: Send + Sync {
    /// Called after a failed attempt, before sleeping
    fn on_retry(&self, context: &RetryContext);
}

impl<F> RetryHook for F
where
    F: Fn(&RetryContext) + Send + Sync,
{
    fn on_retry(&self, context: &RetryContext) {
        self(context);
    }
}

/// Hook that ignores every retry
#[derive(Debug, Default)]
pub struct NoopRetryHook;

impl RetryHook for NoopRetryHook {
    fn on_retry(&self, _context: &RetryContext) {}
}

/// Re-runs an operation while it fails with a retryable error
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Executor following `config`
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Runs `operation` until it succeeds, fails permanently or runs out of attempts
    pub async fn execute<F, Fut, T>(&self, operation: F) -> DataForSeoResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = DataForSeoResult<T>>,
    {
        self.execute_with_hook(operation, &NoopRetryHook).await
    }

    /// Execute an operation with retry logic, reporting each retry to `hook`.
    ///
    /// Non-retryable errors are returned immediately. After the last attempt
    /// the final error is returned without sleeping.
    pub async fn execute_with_hook<F, Fut, T, H>(&self, operation: F, hook: &H) -> DataForSeoResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = DataForSeoResult<T>>,
        H: RetryHook + ?Sized,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if !error.is_retryable() || attempt >= max_attempts {
                        return Err(error);
                    }

                    let delay = self.config.calculate_delay(attempt);
                    let context = RetryContext {
                        attempt,
                        max_attempts,
                        error,
                        next_delay: delay,
                    };
                    hook.on_retry(&context);

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = RetryConfig::new()
            .with_base_delay(Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(5));

        assert_eq!(config.backoff(1), Duration::from_secs(1));
        assert_eq!(config.backoff(2), Duration::from_secs(2));
        assert_eq!(config.backoff(3), Duration::from_secs(4));
        assert_eq!(config.backoff(4), Duration::from_secs(5));
        assert_eq!(config.backoff(60), Duration::from_secs(5));
    }

    #[test]
    fn test_without_jitter_delay_is_exact() {
        let config = RetryConfig::new().with_base_delay(Duration::from_millis(100));
        for _ in 0..10 {
            assert_eq!(config.calculate_delay(2), Duration::from_millis(200));
        }
    }

    #[test]
    fn test_jitter_stays_within_half_to_full() {
        let config = RetryConfig::new()
            .with_base_delay(Duration::from_millis(100))
            .with_jitter(true);

        for _ in 0..100 {
            let delay = config.calculate_delay(3);
            assert!(delay >= Duration::from_millis(200));
            assert!(delay <= Duration::from_millis(400));
        }
    }

    #[test]
    fn test_max_attempts_is_at_least_one() {
        let config = RetryConfig::new().with_max_attempts(0);
        assert_eq!(config.max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hook_sees_each_retry_before_success() {
        let executor = RetryExecutor::new(RetryConfig::new().with_max_attempts(4));
        let seen = parking_lot::Mutex::new(Vec::new());
        let calls = std::sync::atomic::AtomicU32::new(0);
        let hook = |context: &RetryContext| {
            seen.lock().push((context.attempt, context.max_attempts, context.next_delay));
        };

        let result = executor
            .execute_with_hook(
                || async {
                    let call = calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    if call < 2 {
                        Err(DataForSeoError::Upstream {
                            status: 503,
                            message: "Service Unavailable".to_string(),
                        })
                    } else {
                        Ok("payload")
                    }
                },
                &hook,
            )
            .await;

        assert_eq!(result.unwrap(), "payload");
        assert_eq!(
            *seen.lock(),
            vec![
                (1, 4, Duration::from_secs(1)),
                (2, 4, Duration::from_secs(2)),
            ]
        );
    }
}
