//! Time-expiring key/value cache.
//!
//! Entries are checked for staleness only when read; there is no background
//! sweeper. The map is a `DashMap`, so the cache can be shared between
//! concurrently running workflows without an external lock.

use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Default lifetime of a cached entry (10 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_stale(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) > ttl
    }
}

/// Generic TTL cache keyed by string.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        trace!(target: "cache", key = %key, "set");
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Return the value for `key` if it is still fresh.
    ///
    /// A stale entry is removed as a side effect, so a miss does not imply the
    /// key was never set.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entry = self.entries.get(key)?;
            if !entry.is_stale(now, self.ttl) {
                return Some(entry.value.clone());
            }
        }

        // Only drop the entry if it is still the stale one; a concurrent `set`
        // may have refreshed it since the read above.
        let ttl = self.ttl;
        self.entries
            .remove_if(key, |_, entry| entry.is_stale(now, ttl));
        trace!(target: "cache", key = %key, "expired");
        None
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, stale ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_get_after_set_returns_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("voices", vec![1, 2, 3]);
        assert_eq!(cache.get("voices"), Some(vec![1, 2, 3]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_visible_up_to_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("k", "v".to_string());

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").as_deref(), Some("v"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_purged() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("k", 7u32);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get("k"), None);
        // The read removed the stale entry
        assert!(cache.is_empty());
        assert_eq!(cache.get("k"), None);

        cache.set("k", 8u32);
        assert_eq!(cache.get("k"), Some(8));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_overwrites_and_refreshes() {
        let cache = TtlCache::new(Duration::from_secs(10));
        cache.set("k", 1u32);
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set("k", 2u32);
        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_clear_empties_store() {
        let cache = TtlCache::default();
        cache.set("a", 1u8);
        cache.set("b", 2u8);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.ttl(), DEFAULT_TTL);
    }

    #[test]
    fn test_missing_key() {
        let cache: TtlCache<u8> = TtlCache::default();
        assert_eq!(cache.get("nope"), None);
    }
}
