//! Resilience patterns for the DataForSEO client.
//!
//! Provides retry logic, circuit breaker, and rate limiting functionality.

mod circuit_breaker;
mod orchestrator;
mod rate_limiter;
mod retry;

pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitObserver, CircuitState, CircuitStats,
    NoopCircuitObserver,
};
pub use orchestrator::{BreakerScope, ResilienceConfig, ResilienceOrchestrator};
pub use rate_limiter::{RateLimitConfig, RateLimiter, RateLimiterMetrics};
pub use retry::{NoopRetryHook, RetryConfig, RetryContext, RetryExecutor, RetryHook};
