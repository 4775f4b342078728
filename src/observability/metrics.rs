//! Metrics collection for the DataForSEO client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;

use crate::resilience::CircuitState;

/// Receives pipeline events. Implementations must be cheap; they run on
/// every request.
pub trait MetricsCollector: Send + Sync {
    /// Records a finished request, cached or remote.
    fn record_request(&self, category: &str, duration: Duration, success: bool);

    /// A failed attempt of `category` is about to be retried.
    fn record_retry(&self, category: &str, attempt: u32);

    /// Records a response served from cache.
    fn record_cache_hit(&self, category: &str);

    /// Records a circuit breaker state change.
    fn record_circuit_state(&self, scope: &str, state: CircuitState);

    /// Totals since creation or the last reset.
    fn snapshot(&self) -> MetricsSnapshot;
}

/// Per-category counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointMetrics {
    /// Requests recorded.
    pub count: u64,
    /// Sum of request durations in milliseconds.
    pub total_duration_ms: u64,
    /// Failed requests.
    pub errors: u64,
}

/// Aggregated client metrics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Total requests made.
    pub total_requests: u64,
    /// Failed requests.
    pub total_errors: u64,
    /// Total retries.
    pub total_retries: u64,
    /// Requests answered from cache.
    pub cache_hits: u64,
    /// Mean pipeline time per request, in milliseconds.
    pub avg_duration_ms: f64,
    /// Counters per endpoint category.
    pub by_category: HashMap<String, EndpointMetrics>,
    /// Last known breaker state per scope.
    pub circuit_states: HashMap<String, String>,
}

impl MetricsSnapshot {
    /// Fraction of requests that failed, `0.0` when nothing was recorded.
    pub fn error_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_errors as f64 / self.total_requests as f64
        }
    }
}

/// Process-local collector backing [`HealthMonitor`](super::HealthMonitor).
pub struct InMemoryMetricsCollector {
    total_requests: AtomicU64,
    total_errors: AtomicU64,
    total_retries: AtomicU64,
    cache_hits: AtomicU64,
    total_duration_ms: AtomicU64,
    by_category: RwLock<HashMap<String, EndpointMetrics>>,
    circuit_states: RwLock<HashMap<String, String>>,
}

impl Default for InMemoryMetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMetricsCollector {
    /// Collector with every counter at zero.
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
            total_retries: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            total_duration_ms: AtomicU64::new(0),
            by_category: RwLock::new(HashMap::new()),
            circuit_states: RwLock::new(HashMap::new()),
        }
    }

    /// Resets all counters. Breaker states are kept.
    pub fn reset(&self) {
        self.total_requests.store(0, Ordering::SeqCst);
        self.total_errors.store(0, Ordering::SeqCst);
        self.total_retries.store(0, Ordering::SeqCst);
        self.cache_hits.store(0, Ordering::SeqCst);
        self.total_duration_ms.store(0, Ordering::SeqCst);
        self.by_category.write().clear();
    }
}

impl MetricsCollector for InMemoryMetricsCollector {
    fn record_request(&self, category: &str, duration: Duration, success: bool) {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.total_requests.fetch_add(1, Ordering::SeqCst);
        self.total_duration_ms.fetch_add(millis, Ordering::SeqCst);
        if !success {
            self.total_errors.fetch_add(1, Ordering::SeqCst);
        }

        let mut categories = self.by_category.write();
        let entry = categories.entry(category.to_string()).or_default();
        entry.count += 1;
        entry.total_duration_ms = entry.total_duration_ms.saturating_add(millis);
        if !success {
            entry.errors += 1;
        }
    }

    fn record_retry(&self, _category: &str, _attempt: u32) {
        self.total_retries.fetch_add(1, Ordering::SeqCst);
    }

    fn record_cache_hit(&self, _category: &str) {
        self.cache_hits.fetch_add(1, Ordering::SeqCst);
    }

    fn record_circuit_state(&self, scope: &str, state: CircuitState) {
        self.circuit_states
            .write()
            .insert(scope.to_string(), state.as_str().to_string());
    }

    fn snapshot(&self) -> MetricsSnapshot {
        let total = self.total_requests.load(Ordering::SeqCst);
        let total_duration = self.total_duration_ms.load(Ordering::SeqCst);
        let avg_duration = if total > 0 {
            total_duration as f64 / total as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            total_requests: total,
            total_errors: self.total_errors.load(Ordering::SeqCst),
            total_retries: self.total_retries.load(Ordering::SeqCst),
            cache_hits: self.cache_hits.load(Ordering::SeqCst),
            avg_duration_ms: avg_duration,
            by_category: self.by_category.read().clone(),
            circuit_states: self.circuit_states.read().clone(),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NoopMetricsCollector;

impl MetricsCollector for NoopMetricsCollector {
    fn record_request(&self, _category: &str, _duration: Duration, _success: bool) {}
    fn record_retry(&self, _category: &str, _attempt: u32) {}
    fn record_cache_hit(&self, _category: &str) {}
    fn record_circuit_state(&self, _scope: &str, _state: CircuitState) {}
    fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot::default()
    }
}
