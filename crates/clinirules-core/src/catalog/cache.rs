//! Bounded, time-expiring cache over catalog description lookups.
//!
//! Performance aid only: a miss always falls through to the authoritative
//! in-memory table, so the hit path and the miss path return the same
//! result.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::{normalize_code, CodeCatalog};

/// Default cache capacity.
const DEFAULT_CAPACITY: usize = 256;

/// Default entry time-to-live.
const DEFAULT_TTL: Duration = Duration::from_secs(600);

struct CacheEntry {
    stored_at: Instant,
    description: Option<String>,
}

/// Read-through cache wrapping [`CodeCatalog::description`].
pub struct CachedCodeCatalog {
    inner: CodeCatalog,
    entries: Mutex<HashMap<String, CacheEntry>>,
    capacity: usize,
    ttl: Duration,
}

impl CachedCodeCatalog {
    /// Wrap a catalog with the default capacity and TTL.
    pub fn new(inner: CodeCatalog) -> Self {
        Self::with_limits(inner, DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    /// Wrap a catalog with explicit limits.
    pub fn with_limits(inner: CodeCatalog, capacity: usize, ttl: Duration) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// The wrapped catalog, for the lookups that are not cached.
    pub fn catalog(&self) -> &CodeCatalog {
        &self.inner
    }

    /// Cached description lookup. Results are stable for the process
    /// lifetime, so expiry only bounds memory, never correctness.
    pub fn description(&self, code: &str) -> Option<String> {
        let key = normalize_code(code);

        if let Ok(mut entries) = self.entries.lock() {
            if let Some(entry) = entries.get(&key) {
                if entry.stored_at.elapsed() < self.ttl {
                    return entry.description.clone();
                }
                entries.remove(&key);
            }
        }

        let description = self.inner.description(code);

        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() >= self.capacity {
                // Evict the stalest entry to stay bounded
                if let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.stored_at)
                    .map(|(k, _)| k.clone())
                {
                    entries.remove(&oldest);
                }
            }
            entries.insert(
                key,
                CacheEntry {
                    stored_at: Instant::now(),
                    description: description.clone(),
                },
            );
        }

        description
    }

    /// Number of live cache entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_path_equals_miss_path() {
        let cached = CachedCodeCatalog::new(CodeCatalog::new());

        let miss = cached.description("I10");
        let hit = cached.description("I10");
        assert_eq!(miss, hit);
        assert_eq!(miss, cached.catalog().description("I10"));
    }

    #[test]
    fn test_negative_lookups_are_cached_too() {
        let cached = CachedCodeCatalog::new(CodeCatalog::new());
        assert!(cached.description("Z99").is_none());
        assert_eq!(cached.len(), 1);
        assert!(cached.description("Z99").is_none());
    }

    #[test]
    fn test_capacity_is_bounded() {
        let cached = CachedCodeCatalog::with_limits(CodeCatalog::new(), 2, DEFAULT_TTL);
        cached.description("I10");
        cached.description("E11");
        cached.description("J45");
        assert!(cached.len() <= 2);
        // Evicted entries still resolve through the table
        assert!(cached.description("I10").is_some());
    }

    #[test]
    fn test_expired_entries_fall_back_to_table() {
        let cached = CachedCodeCatalog::with_limits(CodeCatalog::new(), 16, Duration::from_secs(0));
        assert!(cached.description("I10").is_some());
        // TTL of zero expires immediately; result must still be correct
        assert_eq!(cached.description("I10"), cached.catalog().description("I10"));
    }

    #[test]
    fn test_keys_are_normalized() {
        let cached = CachedCodeCatalog::new(CodeCatalog::new());
        cached.description("i10");
        cached.description(" I10 ");
        assert_eq!(cached.len(), 1);
    }
}
