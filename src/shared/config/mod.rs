pub mod model;
mod provider;


use once_cell::sync::Lazy;
use std::sync::Arc;

pub use model::{CacheConfig, DEFAULT_CACHE_TTL_SECONDS, LoggingConfig, Settings, load_settings};
pub use provider::{CACHE_KEY_PREFIX, CACHE_TTL_SECONDS, ConfigProvider};

pub static CONFIG: Lazy<Arc<Settings>> =
    Lazy::new(|| Arc::new(load_settings().expect("Failed to load configuration")));
