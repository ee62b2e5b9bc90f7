use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::query_task_handler::{HandlerOutcome, QueryTaskHandler};
use crate::engine::cache::CacheStore;
use crate::engine::errors::{CacheStoreError, ChainError};
use crate::engine::task::{QueryTask, Signature, triggers};
use crate::shared::config::{CACHE_TTL_SECONDS, ConfigProvider, DEFAULT_CACHE_TTL_SECONDS};

const HANDLER_NAME: &str = "Cache";

/// Read-through cache in front of storage.
///
/// Plain reads are answered from the cache when possible and written back
/// after storage answers them. Mutations evict every cached read of the
/// table they touch. A task recorded under a mutating trigger counts as a
/// mutation whatever statement its query reports.
pub struct CacheHandler {
    store: Arc<dyn CacheStore>,
    ttl_seconds: u64,
}

impl CacheHandler {
    pub fn new(store: Arc<dyn CacheStore>, config: &dyn ConfigProvider) -> Self {
        Self::with_ttl(
            store,
            config.u64_or(CACHE_TTL_SECONDS, DEFAULT_CACHE_TTL_SECONDS),
        )
    }

    pub fn with_ttl(store: Arc<dyn CacheStore>, ttl_seconds: u64) -> Self {
        Self { store, ttl_seconds }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn can_query(&self, key: &str) -> Result<bool, CacheStoreError> {
        self.store.has(key)
    }

    /// Forgets every cached read belonging to the signature's table and
    /// returns how many entries went away.
    pub fn invalidate_table(&self, signature: &Signature) -> Result<usize, ChainError> {
        let to_invalidation = |source: CacheStoreError| ChainError::CacheInvalidation {
            table: signature.table().to_string(),
            source,
        };

        let raw_keys = self
            .store
            .scan_keys_by_pattern(&signature.invalidation_pattern())
            .map_err(to_invalidation)?;

        let prefix = self.store.prefix();
        let suffix = signature.table_suffix();
        let mut removed = 0;
        for raw_key in &raw_keys {
            let key = raw_key.strip_prefix(prefix).unwrap_or(raw_key);
            if !key.ends_with(&suffix) {
                continue;
            }
            if self.store.forget(key).map_err(to_invalidation)? {
                removed += 1;
            }
        }

        info!(
            target: "query_chain::cache",
            table = signature.table(),
            removed,
            "Invalidated cached reads"
        );
        Ok(removed)
    }

    fn write_back(&self, signature: &Signature, result: &Value) -> Result<bool, CacheStoreError> {
        let key = signature.cache_key();
        if self.can_query(&key)? {
            return Ok(false);
        }
        self.store.put(&key, result.clone(), self.ttl_seconds)?;
        Ok(true)
    }
}

impl QueryTaskHandler for CacheHandler {
    fn name(&self) -> &str {
        HANDLER_NAME
    }

    fn begin_processing(&self, task: &mut QueryTask) -> HandlerOutcome {
        if triggers::is_mutating(task.trigger()) {
            return HandlerOutcome::NotApplicable;
        }
        let Some(signature) = task.signature() else {
            return HandlerOutcome::NotApplicable;
        };
        if !signature.is_cacheable() {
            return HandlerOutcome::NotApplicable;
        }

        let key = signature.cache_key();
        match self.can_query(&key) {
            Ok(true) => {}
            Ok(false) => {
                debug!(target: "query_chain::cache", key = %key, "Cache miss");
                return HandlerOutcome::NotApplicable;
            }
            Err(err) => return HandlerOutcome::Failed(err.into()),
        }

        match self.store.get(&key) {
            Ok(Some(value)) => {
                debug!(target: "query_chain::cache", key = %key, "Cache hit");
                HandlerOutcome::Handled(value)
            }
            // Expired between the two lookups.
            Ok(None) => HandlerOutcome::NotApplicable,
            Err(err) => HandlerOutcome::Failed(err.into()),
        }
    }

    fn finalize_processing(&self, task: &mut QueryTask, result: &Value) {
        // After storage ran, this is the query that actually ran, deferred
        // callables included.
        let Some(signature) = task.signature() else {
            return;
        };

        if signature.is_mutation() || triggers::is_mutating(task.trigger()) {
            if let Err(err) = self.invalidate_table(&signature) {
                warn!(
                    target: "query_chain::cache",
                    task = task.display_name(),
                    error = %err,
                    "Cache invalidation failed after mutation"
                );
                err.log_error();
            }
            return;
        }

        if !signature.is_cacheable() {
            return;
        }

        match self.write_back(&signature, result) {
            Ok(true) => debug!(
                target: "query_chain::cache",
                table = signature.table(),
                ttl = self.ttl_seconds,
                "Cached read result"
            ),
            Ok(false) => {}
            Err(err) => warn!(
                target: "query_chain::cache",
                task = task.display_name(),
                error = %err,
                "Failed to cache read result"
            ),
        }
    }

    fn finalize_processing_with_error(&self, task: &QueryTask, err: ChainError) -> ChainError {
        warn!(
            target: "query_chain::cache",
            task = task.display_name(),
            error = %err,
            "Cache query task failed"
        );
        ChainError::task_failed(HANDLER_NAME, task.display_name(), err)
    }

    fn alternate_processing(&self, task: &mut QueryTask) -> Result<Value, ChainError> {
        Err(ChainError::Unresolved {
            handler: HANDLER_NAME.to_string(),
            task: task.display_name().to_string(),
        })
    }
}
