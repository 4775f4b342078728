//! Health reporting and threshold alerts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;

use super::metrics::{MetricsCollector, MetricsSnapshot};

/// Error rate below which the client is reported healthy.
pub const HEALTHY_ERROR_RATE: f64 = 0.1;

/// Overall health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// Error rate below [`HEALTHY_ERROR_RATE`].
    Healthy,
    /// Error rate at or above [`HEALTHY_ERROR_RATE`].
    Degraded,
}

/// Health derived from a metrics snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Overall state.
    pub status: HealthState,
    /// Failed requests over total requests.
    pub error_rate: f64,
    /// Requests recorded.
    pub total_requests: u64,
    /// Failures recorded.
    pub total_errors: u64,
}

impl HealthStatus {
    /// Evaluates `snapshot`.
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Self {
        let error_rate = snapshot.error_rate();
        Self {
            status: if error_rate < HEALTHY_ERROR_RATE {
                HealthState::Healthy
            } else {
                HealthState::Degraded
            },
            error_rate,
            total_requests: snapshot.total_requests,
            total_errors: snapshot.total_errors,
        }
    }
}

/// Limits that raise alerts.
#[derive(Debug, Clone)]
pub struct AlertThresholds {
    /// Error rate strictly above this raises [`AlertKind::HighErrorRate`].
    pub error_rate: f64,
    /// Total requests strictly above this raises [`AlertKind::HighVolume`].
    pub high_volume: u64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            error_rate: 0.2,
            high_volume: 1000,
        }
    }
}

/// Alert categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    /// Too many failures.
    HighErrorRate,
    /// Unusually many requests.
    HighVolume,
}

/// A raised alert.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// What tripped.
    pub kind: AlertKind,
    /// Human-readable description.
    pub message: String,
    /// When it was raised.
    pub raised_at: DateTime<Utc>,
}

/// Tracks active alerts.
#[derive(Debug, Default)]
pub struct AlertManager {
    thresholds: AlertThresholds,
    active: Mutex<Vec<Alert>>,
}

impl AlertManager {
    /// Creates a manager with the given thresholds.
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self {
            thresholds,
            active: Mutex::new(Vec::new()),
        }
    }

    /// Raises alerts tripped by `snapshot` and returns every active alert.
    pub fn check(&self, snapshot: &MetricsSnapshot) -> Vec<Alert> {
        let mut tripped = Vec::new();
        let error_rate = snapshot.error_rate();
        if error_rate > self.thresholds.error_rate {
            tripped.push((
                AlertKind::HighErrorRate,
                format!("Error rate {:.1}% exceeds threshold", error_rate * 100.0),
            ));
        }
        if snapshot.total_requests > self.thresholds.high_volume {
            tripped.push((
                AlertKind::HighVolume,
                format!("{} requests exceed volume threshold", snapshot.total_requests),
            ));
        }

        let mut active = self.active.lock();
        for (kind, message) in tripped {
            if active.iter().any(|alert| alert.kind == kind) {
                continue;
            }
            tracing::warn!(kind = ?kind, %message, "Alert raised");
            active.push(Alert {
                kind,
                message,
                raised_at: Utc::now(),
            });
        }
        active.clone()
    }

    /// Active alerts without re-evaluating.
    pub fn active(&self) -> Vec<Alert> {
        self.active.lock().clone()
    }

    /// Drops every active alert.
    pub fn clear(&self) {
        self.active.lock().clear();
    }
}

/// Full health report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Always `"success"` when the report could be built.
    pub status: &'static str,
    /// Report time.
    pub timestamp: DateTime<Utc>,
    /// Derived health.
    pub health: HealthStatus,
    /// Raw metrics.
    pub metrics: MetricsSnapshot,
    /// Active alerts.
    pub alerts: Vec<Alert>,
    /// Seconds since the monitor was created.
    pub uptime_secs: u64,
}

/// Builds health reports from a metrics collector.
pub struct HealthMonitor {
    metrics: Arc<dyn MetricsCollector>,
    alerts: AlertManager,
    started_at: Instant,
}

impl HealthMonitor {
    /// Creates a monitor with default thresholds.
    pub fn new(metrics: Arc<dyn MetricsCollector>) -> Self {
        Self::with_thresholds(metrics, AlertThresholds::default())
    }

    /// Creates a monitor with custom thresholds.
    pub fn with_thresholds(metrics: Arc<dyn MetricsCollector>, thresholds: AlertThresholds) -> Self {
        Self {
            metrics,
            alerts: AlertManager::new(thresholds),
            started_at: Instant::now(),
        }
    }

    /// Snapshot, health and alerts at this instant.
    pub fn report(&self) -> HealthReport {
        let metrics = self.metrics.snapshot();
        HealthReport {
            status: "success",
            timestamp: Utc::now(),
            health: HealthStatus::from_snapshot(&metrics),
            alerts: self.alerts.check(&metrics),
            metrics,
            uptime_secs: self.started_at.elapsed().as_secs(),
        }
    }

    /// Clears active alerts.
    pub fn clear_alerts(&self) {
        self.alerts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::InMemoryMetricsCollector;
    use std::time::Duration;

    fn record(collector: &InMemoryMetricsCollector, ok: u32, failed: u32) {
        for _ in 0..ok {
            collector.record_request("keywords", Duration::ZERO, true);
        }
        for _ in 0..failed {
            collector.record_request("keywords", Duration::ZERO, false);
        }
    }

    #[test]
    fn test_health_thresholds() {
        let collector = InMemoryMetricsCollector::new();
        record(&collector, 91, 9);
        let health = HealthStatus::from_snapshot(&collector.snapshot());
        assert_eq!(health.status, HealthState::Healthy);

        record(&collector, 0, 2);
        let health = HealthStatus::from_snapshot(&collector.snapshot());
        assert_eq!(health.status, HealthState::Degraded);
    }

    #[test]
    fn test_alerts_are_not_duplicated() {
        let collector = Arc::new(InMemoryMetricsCollector::new());
        record(&collector, 3, 2);
        let monitor = HealthMonitor::new(collector.clone());

        assert_eq!(monitor.report().alerts.len(), 1);
        let report = monitor.report();
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].kind, AlertKind::HighErrorRate);

        monitor.clear_alerts();
        record(&collector, 100, 0);
        assert!(monitor.report().alerts.is_empty());
    }

    #[test]
    fn test_high_volume_alert() {
        let collector = Arc::new(InMemoryMetricsCollector::new());
        record(&collector, 1001, 0);
        let monitor = HealthMonitor::new(collector);

        let report = monitor.report();
        assert_eq!(report.status, "success");
        assert_eq!(report.alerts[0].kind, AlertKind::HighVolume);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["alerts"][0]["kind"], "HIGH_VOLUME");
        assert_eq!(json["health"]["status"], "healthy");
    }
}
