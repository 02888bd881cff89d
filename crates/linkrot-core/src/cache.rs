//! In-memory cache for URL status checks.
//!
//! Avoids redundant fetches when the same URL is checked repeatedly within a
//! short window (e.g. the same reference appearing in several analyses, or a
//! page reload re-firing every `/check` call).
//!
//! Keys are the sanitized URL. Only completed responses are cached; transport
//! failures (timeouts, network errors) are never cached so a transient outage
//! does not stick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::classify::CheckOutcome;

/// Default time-to-live for cached statuses.
const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// A timestamped cache entry.
#[derive(Clone, Copy, Debug)]
struct CacheEntry {
    status: u16,
    inserted_at: Instant,
}

/// Thread-safe in-memory cache of URL check statuses.
///
/// Uses [`DashMap`] for lock-free concurrent access from request handlers and
/// task runners.
pub struct StatusCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl StatusCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a cached status for `url`. `None` on miss or expiry.
    pub fn get(&self, url: &str) -> Option<CheckOutcome> {
        let entry = match self.entries.get(url) {
            Some(e) => *e,
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        if entry.inserted_at.elapsed() > self.ttl {
            self.entries.remove(url);
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(CheckOutcome::Status(entry.status))
    }

    /// Insert a check outcome. Transport failures are dropped, not cached.
    pub fn insert(&self, url: &str, outcome: CheckOutcome) {
        let CheckOutcome::Status(status) = outcome else {
            return;
        };
        self.entries.insert(
            url.to_string(),
            CacheEntry {
                status,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of cache hits since creation.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of cache misses since creation.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for StatusCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusCache")
            .field("entries", &self.entries.len())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_on_empty() {
        let cache = StatusCache::default();
        assert!(cache.get("http://example.com").is_none());
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn hit_after_insert() {
        let cache = StatusCache::default();
        cache.insert("http://example.com/a.pdf", CheckOutcome::Status(200));
        assert_eq!(
            cache.get("http://example.com/a.pdf"),
            Some(CheckOutcome::Status(200))
        );
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn error_statuses_are_cached_too() {
        let cache = StatusCache::default();
        cache.insert("http://example.com/gone", CheckOutcome::Status(404));
        assert_eq!(
            cache.get("http://example.com/gone"),
            Some(CheckOutcome::Status(404))
        );
    }

    #[test]
    fn transport_failure_is_never_cached() {
        let cache = StatusCache::default();
        cache.insert("http://example.com", CheckOutcome::TransportFailure);
        assert!(cache.get("http://example.com").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let cache = StatusCache::new(Duration::from_millis(1));
        cache.insert("http://example.com", CheckOutcome::Status(200));
        std::thread::sleep(Duration::from_millis(10));
        assert!(cache.get("http://example.com").is_none());
    }

    #[test]
    fn len_and_empty() {
        let cache = StatusCache::default();
        assert!(cache.is_empty());
        cache.insert("http://example.com", CheckOutcome::Status(200));
        assert!(!cache.is_empty());
        assert_eq!(cache.len(), 1);
    }
}
