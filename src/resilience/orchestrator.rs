//! Resilience orchestrator combining rate limiting, circuit breaking and retry.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use super::{
    CircuitBreaker, CircuitBreakerConfig, CircuitObserver, CircuitState, RateLimitConfig,
    RateLimiter, RetryConfig, RetryContext, RetryExecutor,
};
use crate::errors::DataForSeoResult;
use crate::observability::{MetricsCollector, NoopMetricsCollector};
use crate::types::EndpointCategory;

/// How circuit breakers are shared between endpoint categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakerScope {
    /// One breaker for the whole client.
    #[default]
    Client,
    /// One breaker per endpoint category.
    PerCategory,
}

/// Configuration for the resilience orchestrator.
#[derive(Debug, Clone, Default)]
pub struct ResilienceConfig {
    /// Retry configuration.
    pub retry: RetryConfig,
    /// Circuit breaker configuration.
    pub circuit_breaker: CircuitBreakerConfig,
    /// Breaker sharing.
    pub breaker_scope: BreakerScope,
    /// Client-wide rate limit.
    pub rate_limit: RateLimitConfig,
    /// Extra limits applied per endpoint category.
    pub category_limits: HashMap<EndpointCategory, RateLimitConfig>,
}

impl ResilienceConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hardened preset: jittered retries, per-category breakers and
    /// per-category rate limits on top of the client-wide one.
    pub fn hardened() -> Self {
        let category_limits = HashMap::from([
            (EndpointCategory::Keywords, RateLimitConfig::per_minute(30)),
            (EndpointCategory::Serp, RateLimitConfig::per_minute(20)),
            (EndpointCategory::Labs, RateLimitConfig::per_minute(15)),
            (EndpointCategory::OnPage, RateLimitConfig::per_minute(10)),
        ]);

        Self {
            retry: RetryConfig::default().with_jitter(true),
            circuit_breaker: CircuitBreakerConfig::default(),
            breaker_scope: BreakerScope::PerCategory,
            rate_limit: RateLimitConfig::default(),
            category_limits,
        }
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the circuit breaker configuration.
    #[must_use]
    pub fn with_circuit_breaker(mut self, circuit_breaker: CircuitBreakerConfig) -> Self {
        self.circuit_breaker = circuit_breaker;
        self
    }

    /// Sets the breaker scope.
    #[must_use]
    pub fn with_breaker_scope(mut self, scope: BreakerScope) -> Self {
        self.breaker_scope = scope;
        self
    }

    /// Sets the client-wide rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Adds a rate limit for one endpoint category.
    #[must_use]
    pub fn with_category_limit(mut self, category: EndpointCategory, limit: RateLimitConfig) -> Self {
        self.category_limits.insert(category, limit);
        self
    }
}

/// Logs breaker transitions and forwards them to metrics.
struct BreakerObserver {
    scope: &'static str,
    metrics: Arc<dyn MetricsCollector>,
}

impl CircuitObserver for BreakerObserver {
    fn on_transition(&self, from: CircuitState, to: CircuitState) {
        tracing::info!(
            scope = self.scope,
            from = from.as_str(),
            to = to.as_str(),
            "Circuit breaker state changed"
        );
        self.metrics.record_circuit_state(self.scope, to);
    }

    fn on_reject(&self) {
        tracing::debug!(scope = self.scope, "Request rejected by open circuit");
    }
}

/// Runs operations under rate limiting, circuit breaking and retry.
///
/// Order: wait for a client-wide slot, then a category slot if one is
/// configured, then the breaker wraps the whole retry sequence. A retry
/// sequence that ends in failure counts as one breaker failure.
pub struct ResilienceOrchestrator {
    retry_executor: RetryExecutor,
    default_breaker: Arc<CircuitBreaker>,
    category_breakers: HashMap<EndpointCategory, Arc<CircuitBreaker>>,
    rate_limiter: RateLimiter,
    category_limiters: HashMap<EndpointCategory, RateLimiter>,
    metrics: Arc<dyn MetricsCollector>,
}

impl ResilienceOrchestrator {
    /// Creates an orchestrator without metrics.
    pub fn new(config: ResilienceConfig) -> Self {
        Self::with_metrics(config, Arc::new(NoopMetricsCollector))
    }

    /// Creates an orchestrator reporting to `metrics`.
    pub fn with_metrics(config: ResilienceConfig, metrics: Arc<dyn MetricsCollector>) -> Self {
        let breaker = |scope: &'static str| {
            Arc::new(
                CircuitBreaker::new(config.circuit_breaker.clone()).with_observer(BreakerObserver {
                    scope,
                    metrics: Arc::clone(&metrics),
                }),
            )
        };

        let category_breakers = match config.breaker_scope {
            BreakerScope::Client => HashMap::new(),
            BreakerScope::PerCategory => EndpointCategory::ALL
                .iter()
                .map(|category| (*category, breaker(category.as_str())))
                .collect(),
        };

        Self {
            retry_executor: RetryExecutor::new(config.retry.clone()),
            default_breaker: breaker("client"),
            category_breakers,
            rate_limiter: RateLimiter::new(config.rate_limit.clone()),
            category_limiters: config
                .category_limits
                .iter()
                .map(|(category, limit)| (*category, RateLimiter::new(limit.clone())))
                .collect(),
            metrics,
        }
    }

    /// Returns the breaker guarding `category`.
    pub fn circuit_breaker(&self, category: EndpointCategory) -> &CircuitBreaker {
        self.category_breakers
            .get(&category)
            .unwrap_or(&self.default_breaker)
    }

    /// Returns the client-wide rate limiter.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Returns the retry executor.
    pub fn retry_executor(&self) -> &RetryExecutor {
        &self.retry_executor
    }

    /// Executes an operation with resilience patterns applied.
    pub async fn execute<F, Fut, T>(
        &self,
        category: EndpointCategory,
        operation: &str,
        f: F,
    ) -> DataForSeoResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = DataForSeoResult<T>>,
    {
        self.rate_limiter.wait_for_slot().await;
        if let Some(limiter) = self.category_limiters.get(&category) {
            limiter.wait_for_slot().await;
        }

        let metrics = &self.metrics;
        let on_retry = |context: &RetryContext| {
            tracing::warn!(
                operation,
                category = category.as_str(),
                attempt = context.attempt,
                max_attempts = context.max_attempts,
                delay_ms = context.next_delay.as_millis(),
                error = %context.error,
                "Retrying DataForSEO request"
            );
            metrics.record_retry(category.as_str(), context.attempt);
        };

        self.circuit_breaker(category)
            .execute(|| self.retry_executor.execute_with_hook(f, &on_retry))
            .await
    }
}

impl Default for ResilienceOrchestrator {
    fn default() -> Self {
        Self::new(ResilienceConfig::default())
    }
}
