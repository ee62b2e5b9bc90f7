mod cache_store;
mod memory_cache_store;


pub use cache_store::CacheStore;
pub use memory_cache_store::{CacheStoreStats, MemoryCacheStore};
