use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use super::cache_store::CacheStore;
use crate::engine::errors::CacheStoreError;
use crate::shared::config::CacheConfig;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStoreStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub forgets: u64,
}

/// In-process cache store with LRU eviction and per-entry expiry.
///
/// Keys are stored with `prefix` prepended, the way shared key/value servers
/// namespace application keys; scanned keys come back in that raw form.
#[derive(Debug)]
pub struct MemoryCacheStore {
    prefix: String,
    inner: Mutex<LruCache<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    forgets: AtomicU64,
}

impl MemoryCacheStore {
    pub fn new(capacity: usize, prefix: impl Into<String>) -> Self {
        let cap_nz = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            prefix: prefix.into(),
            inner: Mutex::new(LruCache::new(cap_nz)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            forgets: AtomicU64::new(0),
        }
    }

    pub fn from_config(cfg: &CacheConfig) -> Self {
        Self::new(cfg.max_entries, cfg.key_prefix.clone())
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStoreStats {
        CacheStoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            forgets: self.forgets.load(Ordering::Relaxed),
        }
    }
}

impl CacheStore for MemoryCacheStore {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn has(&self, key: &str) -> Result<bool, CacheStoreError> {
        let full = self.full_key(key);
        let mut guard = self.inner.lock();
        let live = match guard.peek(&full) {
            Some(entry) if entry.is_expired(Instant::now()) => {
                guard.pop(&full);
                false
            }
            Some(_) => true,
            None => false,
        };
        Ok(live)
    }

    fn get(&self, key: &str) -> Result<Option<Value>, CacheStoreError> {
        let full = self.full_key(key);
        let mut guard = self.inner.lock();
        let found = match guard.get(&full) {
            Some(entry) if entry.is_expired(Instant::now()) => {
                guard.pop(&full);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        };
        drop(guard);

        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(found)
    }

    fn put(&self, key: &str, value: Value, ttl_seconds: u64) -> Result<(), CacheStoreError> {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
        };
        let full = self.full_key(key);
        let displaced = self.inner.lock().push(full.clone(), entry);
        if let Some((evicted_key, _)) = displaced.filter(|(k, _)| *k != full) {
            debug!(target: "query_chain::cache", key = %evicted_key, "Evicted cache entry");
        }
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn scan_keys_by_pattern(&self, pattern: &str) -> Result<Vec<String>, CacheStoreError> {
        let matcher =
            glob::Pattern::new(pattern).map_err(|e| CacheStoreError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.msg.to_string(),
            })?;
        let now = Instant::now();
        let guard = self.inner.lock();
        Ok(guard
            .iter()
            .filter(|(key, entry)| !entry.is_expired(now) && matcher.matches(key))
            .map(|(key, _)| key.clone())
            .collect())
    }

    fn forget(&self, key: &str) -> Result<bool, CacheStoreError> {
        let removed = self.inner.lock().pop(&self.full_key(key)).is_some();
        if removed {
            self.forgets.fetch_add(1, Ordering::Relaxed);
        }
        Ok(removed)
    }
}
