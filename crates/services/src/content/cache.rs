//! Process-local query result cache with per-entry TTL.
//!
//! Expiry is checked lazily on read; there is no background sweep and no
//! size bound. The map sits behind a mutex so one cache can be shared by
//! every request handler. Concurrent misses on the same key each fetch and
//! the last `set` wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Source of "now" for expiry checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub data: serde_json::Value,
    /// Insertion time, epoch milliseconds
    pub timestamp: i64,
    /// Lifetime in seconds
    pub duration: u64,
}

impl CacheEntry {
    fn is_fresh(&self, now_ms: i64) -> bool {
        let age_seconds = (now_ms - self.timestamp) as f64 / 1000.0;
        age_seconds < self.duration as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

pub struct QueryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    // A poisoned lock still holds a consistent map: every mutation is a
    // single insert/remove/clear.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cached data for `key` if present and not expired
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let now_ms = self.clock.now().timestamp_millis();
        let mut entries = self.entries();

        match entries.get(key) {
            Some(entry) if entry.is_fresh(now_ms) => {
                tracing::debug!(key = %key, "Content cache hit");
                Some(entry.data.clone())
            }
            Some(_) => {
                entries.remove(key);
                tracing::debug!(key = %key, "Content cache entry expired");
                None
            }
            None => {
                tracing::debug!(key = %key, "Content cache miss");
                None
            }
        }
    }

    /// Insert or replace the entry for `key`
    pub fn set(&self, key: &str, data: serde_json::Value, duration_seconds: u64) {
        let entry = CacheEntry {
            data,
            timestamp: self.clock.now().timestamp_millis(),
            duration: duration_seconds,
        };
        self.entries().insert(key.to_string(), entry);
    }

    pub fn clear(&self) {
        let mut entries = self.entries();
        let removed = entries.len();
        entries.clear();
        tracing::info!(removed, "Content cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: entries.len(),
            keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn manual_cache() -> (Arc<ManualClock>, QueryCache) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        ));
        let cache = QueryCache::with_clock(clock.clone());
        (clock, cache)
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let (_, cache) = manual_cache();
        let value = json!({"title": "Konsert", "tags": ["jazz"]});

        cache.set("event:no", value.clone(), 60);
        assert_eq!(cache.get("event:no"), Some(value));
    }

    #[test]
    fn test_get_missing_key() {
        let (_, cache) = manual_cache();
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let (clock, cache) = manual_cache();
        cache.set("k", json!(1), 1);

        clock.advance(chrono::Duration::milliseconds(999));
        assert_eq!(cache.get("k"), Some(json!(1)));

        clock.advance(chrono::Duration::milliseconds(1));
        assert_eq!(cache.get("k"), None);
        assert!(cache.stats().keys.is_empty());
    }

    #[test]
    fn test_expired_entry_stays_listed_until_read() {
        let (clock, cache) = manual_cache();
        cache.set("k", json!(1), 1);
        clock.advance(chrono::Duration::seconds(5));

        // no background sweep
        assert_eq!(cache.stats().size, 1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_set_replaces_entry_and_timestamp() {
        let (clock, cache) = manual_cache();
        cache.set("k", json!({"a": 1}), 10);
        clock.advance(chrono::Duration::seconds(8));
        cache.set("k", json!({"b": 2}), 10);
        clock.advance(chrono::Duration::seconds(8));

        assert_eq!(cache.get("k"), Some(json!({"b": 2})));
    }

    #[test]
    fn test_zero_duration_never_hits() {
        let (_, cache) = manual_cache();
        cache.set("k", json!(true), 0);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_clear_and_stats() {
        let (_, cache) = manual_cache();
        cache.set("b", json!(2), 60);
        cache.set("a", json!(1), 60);

        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.keys, vec!["a".to_string(), "b".to_string()]);

        cache.clear();
        assert_eq!(cache.stats().size, 0);
        assert_eq!(cache.get("a"), None);
    }
}
