//! Observability for the DataForSEO client: logging, metrics and health.
//!
//! Logging goes through `tracing`; [`LoggingConfig`] installs a subscriber.
//! Metrics are collected behind the [`MetricsCollector`] trait and
//! [`HealthMonitor`] turns a snapshot into a health report with alerts.

mod health;
mod logging;
mod metrics;

pub use health::{
    Alert, AlertKind, AlertManager, AlertThresholds, HealthMonitor, HealthReport, HealthState,
    HealthStatus, HEALTHY_ERROR_RATE,
};
pub use logging::{LogFormat, LoggingConfig};
pub use metrics::{
    EndpointMetrics, InMemoryMetricsCollector, MetricsCollector, MetricsSnapshot,
    NoopMetricsCollector,
};
