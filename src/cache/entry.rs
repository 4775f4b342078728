//! Cache entry with TTL support.

use std::time::Duration;
use tokio::time::Instant;

/// A single cached value with its storage time and time-to-live.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value.
    pub value: V,
    /// When the entry was stored.
    pub stored_at: Instant,
    /// How long the entry stays valid.
    pub ttl: Duration,
    /// Position in the eviction order.
    pub(crate) tick: u64,
}

impl<V> CacheEntry<V> {
    /// Creates an entry stored now.
    pub(crate) fn new(value: V, ttl: Duration, tick: u64) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
            tick,
        }
    }

    /// An entry is valid while `now - stored_at <= ttl`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }
}
