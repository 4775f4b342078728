//! In-memory response cache with per-entry TTL and bounded capacity.
//!
//! Eviction is explicit: [`EvictionPolicy::InsertionOrder`] drops the
//! oldest-inserted entry, [`EvictionPolicy::LeastRecentlyUsed`] drops the
//! entry read or written longest ago. Both keep an ordered index of ticks so
//! eviction never scans the whole map.

mod entry;

pub use entry::CacheEntry;

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Default maximum number of entries.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Default TTL for entries stored without one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Which entry to drop when the cache is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Drop the oldest-inserted entry. Reads do not change the order.
    #[default]
    InsertionOrder,
    /// Drop the least recently read or written entry.
    LeastRecentlyUsed,
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries.
    pub max_entries: usize,
    /// TTL for entries stored without one.
    pub default_ttl: Duration,
    /// Eviction policy.
    pub eviction_policy: EvictionPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl: DEFAULT_TTL,
            eviction_policy: EvictionPolicy::default(),
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of entries
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set the default TTL
    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Set the eviction policy
    #[must_use]
    pub fn with_eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = policy;
        self
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Current number of entries.
    pub size: usize,
    /// Maximum number of entries.
    pub max_size: usize,
    /// Reads that found a valid entry.
    pub hits: u64,
    /// Reads that found nothing or an expired entry.
    pub misses: u64,
    /// Entries dropped to make room.
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed.
    pub expirations: u64,
}

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    order: BTreeMap<u64, String>,
    next_tick: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
    expirations: u64,
}

impl<V> CacheState<V> {
    fn next_tick(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.tick);
        Some(entry)
    }

    fn evict_one(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.entries.remove(&key);
        self.evictions += 1;
        Some(key)
    }
}

/// Thread-safe TTL cache.
pub struct CacheManager<V = serde_json::Value> {
    config: CacheConfig,
    state: Mutex<CacheState<V>>,
}

impl<V: Clone> CacheManager<V> {
    /// Creates a cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: BTreeMap::new(),
                next_tick: 0,
                hits: 0,
                misses: 0,
                evictions: 0,
                expirations: 0,
            }),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns a clone of the value if present and not expired.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut state = self.state.lock();

        let Some(expired) = state.entries.get(key).map(|entry| entry.is_expired(now)) else {
            state.misses += 1;
            return None;
        };

        if expired {
            state.remove(key);
            state.expirations += 1;
            state.misses += 1;
            debug!(key, "cache entry expired");
            return None;
        }

        if self.config.eviction_policy == EvictionPolicy::LeastRecentlyUsed {
            let tick = state.next_tick();
            let CacheState { entries, order, .. } = &mut *state;
            if let Some(entry) = entries.get_mut(key) {
                order.remove(&entry.tick);
                order.insert(tick, key.to_string());
                entry.tick = tick;
            }
        }

        state.hits += 1;
        state.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Stores a value. `None` uses the configured default TTL.
    ///
    /// Replacing an existing key never evicts another entry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        if self.config.max_entries == 0 {
            return;
        }

        let key = key.into();
        let ttl = ttl.unwrap_or(self.config.default_ttl);
        let mut state = self.state.lock();

        if state.remove(&key).is_none() && state.entries.len() >= self.config.max_entries {
            if let Some(evicted) = state.evict_one() {
                debug!(key = %evicted, "cache entry evicted");
            }
        }

        let tick = state.next_tick();
        state.order.insert(tick, key.clone());
        state.entries.insert(key, CacheEntry::new(value, ttl, tick));
    }

    /// Removes a key, returning whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.state.lock().remove(key).is_some()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.order.clear();
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.state.lock();

        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            state.remove(key);
        }
        state.expirations += expired.len() as u64;
        expired.len()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Returns true when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            size: state.entries.len(),
            max_size: self.config.max_entries,
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
            expirations: state.expirations,
        }
    }
}

impl<V: Clone> Default for CacheManager<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(max_entries: usize, policy: EvictionPolicy) -> CacheManager<u32> {
        CacheManager::new(
            CacheConfig::new()
                .with_max_entries(max_entries)
                .with_eviction_policy(policy),
        )
    }

    #[test]
    fn test_set_then_get() {
        let cache = cache(10, EvictionPolicy::InsertionOrder);
        cache.set("a", 1, None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_insertion_order_eviction_ignores_reads() {
        let cache = cache(2, EvictionPolicy::InsertionOrder);
        cache.set("a", 1, None);
        cache.set("b", 2, None);
        assert_eq!(cache.get("a"), Some(1));

        cache.set("c", 3, None);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_lru_eviction_keeps_recently_read() {
        let cache = cache(2, EvictionPolicy::LeastRecentlyUsed);
        cache.set("a", 1, None);
        cache.set("b", 2, None);
        assert_eq!(cache.get("a"), Some(1));

        cache.set("c", 3, None);

        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache = cache(2, EvictionPolicy::InsertionOrder);
        cache.set("a", 1, None);
        cache.set("b", 2, None);
        cache.set("a", 10, None);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(10));
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = cache(0, EvictionPolicy::InsertionOrder);
        cache.set("a", 1, None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = cache(10, EvictionPolicy::InsertionOrder);
        cache.set("a", 1, None);
        cache.set("b", 2, None);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = cache(10, EvictionPolicy::InsertionOrder);
        cache.set("a", 1, Some(Duration::from_secs(10)));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(cache.get("a"), Some(1));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.stats().expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = cache(10, EvictionPolicy::InsertionOrder);
        cache.set("short", 1, Some(Duration::from_secs(1)));
        cache.set("long", 2, Some(Duration::from_secs(60)));

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("long"), Some(2));
    }
}
