use serde_json::Value;

use crate::engine::errors::CacheStoreError;

/// Key/value store the cache handler reads through and writes back to.
///
/// `has` followed by `get` (or `put`) is not atomic. Two callers racing on the
/// same key can both miss and both write; the value written is the same
/// result, so the last write wins without harm.
pub trait CacheStore: Send + Sync {
    /// Namespace prepended to every key the store holds. Scanned keys carry
    /// it; keys passed to every other method do not.
    fn prefix(&self) -> &str {
        ""
    }

    fn has(&self, key: &str) -> Result<bool, CacheStoreError>;

    fn get(&self, key: &str) -> Result<Option<Value>, CacheStoreError>;

    fn put(&self, key: &str, value: Value, ttl_seconds: u64) -> Result<(), CacheStoreError>;

    /// Raw keys (store prefix included) matching a glob pattern.
    fn scan_keys_by_pattern(&self, pattern: &str) -> Result<Vec<String>, CacheStoreError>;

    /// Removes `key` (without store prefix). Returns whether an entry was removed.
    fn forget(&self, key: &str) -> Result<bool, CacheStoreError>;
}
