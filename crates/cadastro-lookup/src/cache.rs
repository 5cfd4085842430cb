//! In-memory address cache with lazy TTL expiry.

use crate::provider::AddressRecord;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;

/// Default time-to-live for cached addresses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    record: AddressRecord,
    stored_at: Instant,
}

/// Successful lookups keyed by digits-only postal code.
///
/// Entries older than the TTL are treated as absent; they are only
/// overwritten or dropped, never swept in the background. Uses
/// `tokio::time::Instant` so expiry follows the runtime clock.
#[derive(Debug)]
pub struct AddressCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl AddressCache {
    /// Create an empty cache with the given TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Configured time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh record for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<AddressRecord> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.record.clone())
    }

    /// Store `record` under `key`, replacing any previous entry.
    pub fn put(&self, key: impl Into<String>, record: AddressRecord) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.into(),
            CacheEntry {
                record,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of stored entries, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AddressCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str) -> AddressRecord {
        AddressRecord {
            city: city.to_string(),
            ..AddressRecord::not_informed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_then_get() {
        let cache = AddressCache::default();
        assert!(cache.get("01310100").is_none());

        cache.put("01310100", record("São Paulo"));
        let cached = cache.get("01310100").expect("fresh entry");
        assert_eq!(cached.city, "São Paulo");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = AddressCache::new(Duration::from_secs(60));
        cache.put("01310100", record("São Paulo"));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("01310100").is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("01310100").is_none());
        // Stale entries are not evicted, only hidden
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_overwrites_and_refreshes() {
        let cache = AddressCache::new(Duration::from_secs(60));
        cache.put("01310100", record("Old"));
        tokio::time::advance(Duration::from_secs(50)).await;

        cache.put("01310100", record("New"));
        tokio::time::advance(Duration::from_secs(50)).await;

        assert_eq!(cache.get("01310100").expect("refreshed entry").city, "New");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear() {
        let cache = AddressCache::default();
        cache.put("01310100", record("São Paulo"));
        cache.put("20040002", record("Rio de Janeiro"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
