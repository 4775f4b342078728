//! Consecutive-failure circuit breaker with a single half-open probe.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::errors::{DataForSeoError, DataForSeoResult};

/// Breaker position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through.
    Closed,
    /// Calls fail fast with [`DataForSeoError::CircuitOpen`].
    Open,
    /// The cooldown elapsed; one probe call decides the next state.
    HalfOpen,
}

impl CircuitState {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }
}

/// Breaker tuning.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit.
    pub failure_threshold: u32,
    /// Quiet period after the last failure before a probe is admitted.
    pub recovery_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(60),
        }
    }
}

impl CircuitBreakerConfig {
    /// Five failures, sixty second cooldown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failure threshold. Zero is treated as one.
    #[must_use]
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold.max(1);
        self
    }

    /// Sets the cooldown.
    #[must_use]
    pub fn with_recovery_timeout(mut self, timeout: Duration) -> Self {
        self.recovery_timeout = timeout;
        self
    }
}

/// Notified of transitions and fast failures. Called with the breaker lock
/// held, so implementations must not call back into the breaker.
pub trait CircuitObserver: Send + Sync {
    /// The breaker moved from `from` to `to`.
    fn on_transition(&self, from: CircuitState, to: CircuitState);

    /// A call was refused without running.
    fn on_reject(&self) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NoopCircuitObserver;

impl CircuitObserver for NoopCircuitObserver {
    fn on_transition(&self, _from: CircuitState, _to: CircuitState) {}
}

/// Counters since creation.
#[derive(Debug, Clone)]
pub struct CircuitStats {
    /// Position at the time of the read.
    pub state: CircuitState,
    /// Calls that ran to completion.
    pub calls: u64,
    /// Completed calls that failed.
    pub failures: u64,
    /// Calls refused while open or while a probe was running.
    pub rejections: u64,
    /// Failures since the last success.
    pub consecutive_failures: u32,
}

#[derive(Debug)]
struct Gate {
    state: CircuitState,
    consecutive_failures: u32,
    last_failure: Option<Instant>,
    probe_taken: bool,
}

/// Guards an upstream. Every failed call counts toward the threshold.
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    gate: Mutex<Gate>,
    observer: Box<dyn CircuitObserver>,
    calls: AtomicU64,
    failures: AtomicU64,
    rejections: AtomicU64,
}

impl CircuitBreaker {
    /// Creates a closed breaker.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            gate: Mutex::new(Gate {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                last_failure: None,
                probe_taken: false,
            }),
            observer: Box::new(NoopCircuitObserver),
            calls: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            rejections: AtomicU64::new(0),
        }
    }

    /// Replaces the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: impl CircuitObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Current position. An open breaker whose cooldown elapsed reports
    /// [`CircuitState::HalfOpen`].
    pub fn state(&self) -> CircuitState {
        let mut gate = self.gate.lock();
        self.cool_down(&mut gate);
        gate.state
    }

    /// Failures since the last success.
    pub fn consecutive_failures(&self) -> u32 {
        self.gate.lock().consecutive_failures
    }

    /// Runs `operation` if the breaker admits it and records the result.
    ///
    /// # Errors
    ///
    /// [`DataForSeoError::CircuitOpen`] when refused, otherwise whatever the
    /// operation returned.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> DataForSeoResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = DataForSeoResult<T>>,
    {
        let admission = self.admit()?;
        let result = operation().await;
        admission.settle(result.is_ok());
        result
    }

    /// Counter snapshot.
    pub fn stats(&self) -> CircuitStats {
        let gate = self.gate.lock();
        CircuitStats {
            state: gate.state,
            calls: self.calls.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            consecutive_failures: gate.consecutive_failures,
        }
    }

    fn admit(&self) -> DataForSeoResult<Admission<'_>> {
        let mut gate = self.gate.lock();
        self.cool_down(&mut gate);

        let probe = match gate.state {
            CircuitState::Closed => false,
            CircuitState::HalfOpen if !gate.probe_taken => {
                gate.probe_taken = true;
                true
            }
            CircuitState::HalfOpen | CircuitState::Open => {
                self.rejections.fetch_add(1, Ordering::Relaxed);
                self.observer.on_reject();
                return Err(DataForSeoError::CircuitOpen);
            }
        };

        Ok(Admission {
            breaker: self,
            probe,
            settled: false,
        })
    }

    fn record(&self, probe: bool, ok: bool) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }

        let mut gate = self.gate.lock();
        if probe {
            gate.probe_taken = false;
        }

        if ok {
            gate.consecutive_failures = 0;
            if gate.state == CircuitState::HalfOpen {
                self.move_to(&mut gate, CircuitState::Closed);
            }
            return;
        }

        gate.consecutive_failures = gate.consecutive_failures.saturating_add(1);
        gate.last_failure = Some(Instant::now());
        let trips = match gate.state {
            CircuitState::Closed => gate.consecutive_failures >= self.config.failure_threshold,
            CircuitState::HalfOpen => true,
            CircuitState::Open => false,
        };
        if trips {
            tracing::warn!(
                consecutive_failures = gate.consecutive_failures,
                cooldown_ms = self.config.recovery_timeout.as_millis(),
                "Circuit breaker opened"
            );
            self.move_to(&mut gate, CircuitState::Open);
        }
    }

    fn cool_down(&self, gate: &mut Gate) {
        if gate.state != CircuitState::Open {
            return;
        }
        let quiet = gate
            .last_failure
            .map_or(true, |at| at.elapsed() > self.config.recovery_timeout);
        if quiet {
            self.move_to(gate, CircuitState::HalfOpen);
        }
    }

    fn move_to(&self, gate: &mut Gate, to: CircuitState) {
        let from = gate.state;
        if from == to {
            return;
        }
        gate.state = to;
        gate.probe_taken = false;
        if to == CircuitState::Closed {
            gate.consecutive_failures = 0;
        }
        self.observer.on_transition(from, to);
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

// Permission to run one call. Dropping it unsettled, e.g. when the caller's
// future is cancelled, frees the probe slot without recording anything.
struct Admission<'a> {
    breaker: &'a CircuitBreaker,
    probe: bool,
    settled: bool,
}

impl Admission<'_> {
    fn settle(mut self, ok: bool) {
        self.settled = true;
        self.breaker.record(self.probe, ok);
    }
}

impl Drop for Admission<'_> {
    fn drop(&mut self) {
        if self.probe && !self.settled {
            self.breaker.gate.lock().probe_taken = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn breaker(threshold: u32, cooldown: Duration) -> CircuitBreaker {
        CircuitBreaker::new(
            CircuitBreakerConfig::new()
                .with_failure_threshold(threshold)
                .with_recovery_timeout(cooldown),
        )
    }

    async fn fail(cb: &CircuitBreaker) -> DataForSeoResult<()> {
        cb.execute(|| async {
            Err::<(), _>(DataForSeoError::Network {
                message: "connection reset".to_string(),
            })
        })
        .await
    }

    #[derive(Default)]
    struct Transitions(parking_lot::Mutex<Vec<(CircuitState, CircuitState)>>);

    impl CircuitObserver for Arc<Transitions> {
        fn on_transition(&self, from: CircuitState, to: CircuitState) {
            self.0.lock().push((from, to));
        }
    }

    #[tokio::test]
    async fn test_starts_closed_and_passes_calls() {
        let cb = CircuitBreaker::default();
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.execute(|| async { Ok(7) }).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_threshold_opens_and_fails_fast() {
        let cb = breaker(3, Duration::from_secs(1));
        for _ in 0..3 {
            assert!(matches!(fail(&cb).await, Err(DataForSeoError::Network { .. })));
        }
        assert_eq!(cb.state(), CircuitState::Open);

        let ran = std::sync::atomic::AtomicBool::new(false);
        let result = cb
            .execute(|| async {
                ran.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(DataForSeoError::CircuitOpen)));
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(cb.stats().rejections, 1);
    }

    #[tokio::test]
    async fn test_success_resets_consecutive_failures() {
        let cb = breaker(3, Duration::from_secs(1));
        let _ = fail(&cb).await;
        let _ = fail(&cb).await;
        cb.execute(|| async { Ok(()) }).await.unwrap();
        assert_eq!(cb.consecutive_failures(), 0);

        let _ = fail(&cb).await;
        let _ = fail(&cb).await;
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_probe_frees_the_slot() {
        let cb = breaker(1, Duration::from_secs(1));
        let _ = fail(&cb).await;
        tokio::time::advance(Duration::from_millis(1001)).await;

        {
            let admission = cb.admit().unwrap();
            assert!(admission.probe);
            assert!(matches!(cb.admit(), Err(DataForSeoError::CircuitOpen)));
        }

        assert_eq!(cb.state(), CircuitState::HalfOpen);
        cb.execute(|| async { Ok(()) }).await.unwrap();
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_sees_every_transition() {
        let transitions = Arc::new(Transitions::default());
        let cb = breaker(1, Duration::from_secs(5)).with_observer(Arc::clone(&transitions));

        let _ = fail(&cb).await;
        tokio::time::advance(Duration::from_secs(6)).await;
        let _ = fail(&cb).await;
        tokio::time::advance(Duration::from_secs(6)).await;
        cb.execute(|| async { Ok(()) }).await.unwrap();

        use CircuitState::{Closed, HalfOpen, Open};
        assert_eq!(
            *transitions.0.lock(),
            vec![(Closed, Open), (Open, HalfOpen), (HalfOpen, Open), (Open, HalfOpen), (HalfOpen, Closed)]
        );
    }

    #[tokio::test]
    async fn test_stats() {
        let cb = CircuitBreaker::default();
        cb.execute(|| async { Ok(()) }).await.unwrap();
        let _ = fail(&cb).await;

        let stats = cb.stats();
        assert_eq!(stats.calls, 2);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.consecutive_failures, 1);
        assert_eq!(stats.state, CircuitState::Closed);
    }
}
