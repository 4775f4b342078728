//! Single-flight deduplication of identical concurrent requests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde_json::Value;

use crate::errors::DataForSeoResult;

type SharedCall = Shared<BoxFuture<'static, DataForSeoResult<Value>>>;

/// Upstream calls currently running, keyed by cache key.
#[derive(Default)]
pub(crate) struct InFlightRequests {
    next_id: AtomicU64,
    calls: Mutex<HashMap<String, (u64, SharedCall)>>,
}

impl InFlightRequests {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Joins the call running under `key`, or starts one with `start`.
    ///
    /// Returns the result and whether an existing call was joined. The entry
    /// is removed by whichever waiter finishes first, and only if it still
    /// belongs to the call that was awaited.
    pub(crate) async fn run<F, Fut>(&self, key: &str, start: F) -> (DataForSeoResult<Value>, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = DataForSeoResult<Value>> + Send + 'static,
    {
        let (id, call, joined) = {
            let mut calls = self.calls.lock();
            match calls.get(key) {
                Some((id, call)) => (*id, call.clone(), true),
                None => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let call = start().boxed().shared();
                    calls.insert(key.to_string(), (id, call.clone()));
                    (id, call, false)
                }
            }
        };

        let result = call.await;

        let mut calls = self.calls.lock();
        if calls.get(key).is_some_and(|(current, _)| *current == id) {
            calls.remove(key);
        }

        (result, joined)
    }

    /// Number of distinct calls in flight.
    pub(crate) fn len(&self) -> usize {
        self.calls.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DataForSeoError;
    use serde_json::json;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_calls_share_one_execution() {
        let in_flight = InFlightRequests::new();
        let starts = Arc::new(AtomicU32::new(0));

        let start = |starts: Arc<AtomicU32>| {
            move || async move {
                starts.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(json!({"n": 1}))
            }
        };

        let (first, second) = tokio::join!(
            in_flight.run("k", start(starts.clone())),
            in_flight.run("k", start(starts.clone())),
        );

        assert_eq!(starts.load(Ordering::SeqCst), 1);
        assert_eq!(first.0.unwrap(), json!({"n": 1}));
        assert!(!first.1);
        assert!(second.1);
        assert_eq!(in_flight.len(), 0);
    }

    #[tokio::test]
    async fn test_errors_are_shared_and_entry_cleared() {
        let in_flight = InFlightRequests::new();
        let (result, joined) = in_flight
            .run("k", || async { Err(DataForSeoError::CircuitOpen) })
            .await;

        assert!(matches!(result, Err(DataForSeoError::CircuitOpen)));
        assert!(!joined);
        assert_eq!(in_flight.len(), 0);

        let (result, _) = in_flight.run("k", || async { Ok(json!(2)) }).await;
        assert_eq!(result.unwrap(), json!(2));
    }
}
