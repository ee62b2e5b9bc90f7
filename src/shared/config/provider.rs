use super::model::Settings;

pub const CACHE_TTL_SECONDS: &str = "cache.ttl_seconds";
pub const CACHE_KEY_PREFIX: &str = "cache.key_prefix";

/// Read-only access to named configuration values.
///
/// Handlers receive a provider at construction time instead of reaching for
/// the process-wide `CONFIG`, so tests can hand them any source they like.
pub trait ConfigProvider: Send + Sync {
    fn u64_or(&self, name: &str, default: u64) -> u64;
    fn string_or(&self, name: &str, default: &str) -> String;
}

impl ConfigProvider for config::Config {
    fn u64_or(&self, name: &str, default: u64) -> u64 {
        self.get::<u64>(name).unwrap_or(default)
    }

    fn string_or(&self, name: &str, default: &str) -> String {
        self.get::<String>(name)
            .unwrap_or_else(|_| default.to_string())
    }
}

impl ConfigProvider for Settings {
    fn u64_or(&self, name: &str, default: u64) -> u64 {
        match name {
            CACHE_TTL_SECONDS => self.cache.ttl_seconds,
            "cache.max_entries" => self.cache.max_entries as u64,
            _ => default,
        }
    }

    fn string_or(&self, name: &str, default: &str) -> String {
        match name {
            CACHE_KEY_PREFIX => self.cache.key_prefix.clone(),
            "logging.log_dir" => self.logging.log_dir.clone(),
            "logging.stdout_level" => self.logging.stdout_level.clone(),
            "logging.file_level" => self.logging.file_level.clone(),
            _ => default.to_string(),
        }
    }
}
