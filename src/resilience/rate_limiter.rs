//! Sliding-window rate limiter.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Configuration for the rate limiter
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum operations started within one window
    pub max_requests: usize,
    /// Window length
    pub window: Duration,
    /// Sleep between checks while waiting for a slot
    pub poll_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl RateLimitConfig {
    /// Create a new rate limit configuration
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            ..Self::default()
        }
    }

    /// Create a configuration allowing `max_requests` per minute
    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    /// Set the poll interval
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Sliding-window rate limiter.
///
/// Keeps the start time of every granted operation younger than the window.
/// A slot is free while fewer than `max_requests` of them remain.
pub struct RateLimiter {
    config: RateLimitConfig,
    window: Mutex<VecDeque<Instant>>,
    total_granted: AtomicU64,
    total_denied: AtomicU64,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            window: Mutex::new(VecDeque::with_capacity(config.max_requests)),
            config,
            total_granted: AtomicU64::new(0),
            total_denied: AtomicU64::new(0),
        }
    }

    /// Returns the configuration
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Records and grants a slot if one is free right now.
    ///
    /// Returns false without recording anything when the window is full.
    pub fn check_limit(&self) -> bool {
        let now = Instant::now();
        let mut window = self.window.lock();

        while let Some(oldest) = window.front() {
            if now.saturating_duration_since(*oldest) >= self.config.window {
                window.pop_front();
            } else {
                break;
            }
        }

        if window.len() < self.config.max_requests {
            window.push_back(now);
            self.total_granted.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            self.total_denied.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Waits until a slot is granted, polling at the configured interval.
    pub async fn wait_for_slot(&self) {
        let mut waited = false;
        while !self.check_limit() {
            if !waited {
                tracing::debug!(
                    max_requests = self.config.max_requests,
                    window_ms = self.config.window.as_millis(),
                    "Rate limit reached, waiting for a slot"
                );
                waited = true;
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// Number of operations currently inside the window
    pub fn in_window(&self) -> usize {
        let now = Instant::now();
        self.window
            .lock()
            .iter()
            .filter(|t| now.saturating_duration_since(**t) < self.config.window)
            .count()
    }

    /// Get metrics
    pub fn metrics(&self) -> RateLimiterMetrics {
        RateLimiterMetrics {
            total_granted: self.total_granted.load(Ordering::Relaxed),
            total_denied: self.total_denied.load(Ordering::Relaxed),
            in_window: self.in_window(),
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

/// Metrics for the rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiterMetrics {
    /// Checks that granted a slot
    pub total_granted: u64,
    /// Checks that found the window full
    pub total_denied: u64,
    /// Operations currently inside the window
    pub in_window: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grants_up_to_limit() {
        let limiter = RateLimiter::new(RateLimitConfig::new(3, Duration::from_secs(60)));

        assert!(limiter.check_limit());
        assert!(limiter.check_limit());
        assert!(limiter.check_limit());
        assert!(!limiter.check_limit());

        let metrics = limiter.metrics();
        assert_eq!(metrics.total_granted, 3);
        assert_eq!(metrics.total_denied, 1);
        assert_eq!(metrics.in_window, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_slides() {
        let limiter = RateLimiter::new(RateLimitConfig::new(2, Duration::from_secs(10)));

        assert!(limiter.check_limit());
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(limiter.check_limit());
        assert!(!limiter.check_limit());

        // First timestamp leaves the window, second is still inside
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(limiter.check_limit());
        assert!(!limiter.check_limit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_slot_polls_until_free() {
        let limiter = RateLimiter::new(
            RateLimitConfig::new(1, Duration::from_secs(3))
                .with_poll_interval(Duration::from_secs(1)),
        );
        assert!(limiter.check_limit());

        let start = Instant::now();
        limiter.wait_for_slot().await;

        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert_eq!(limiter.metrics().total_denied, 3);
    }
}
