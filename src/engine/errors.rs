use thiserror::Error;
use tracing::{debug, error};

/// Errors raised while a query task travels through the handler chain.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Query task '{task}' failed to execute: {source}")]
    QueryExecution {
        task: String,
        #[source]
        source: QueryError,
    },

    #[error("Cache store error: {0}")]
    CacheStore(#[from] CacheStoreError),

    #[error("Cache invalidation for table '{table}' failed: {source}")]
    CacheInvalidation {
        table: String,
        #[source]
        source: CacheStoreError,
    },

    #[error("{handler} query task='{task}' failed; reason: ({source})")]
    TaskFailed {
        handler: String,
        task: String,
        #[source]
        source: Box<ChainError>,
    },

    #[error("{handler} query task='{task}' failed; reason: unknown")]
    Unresolved { handler: String, task: String },

    #[error("Transaction error: {0}")]
    Transaction(String),
}

/// Errors produced by an executable query itself.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Unknown trigger '{trigger}' for table '{table}'")]
    UnknownTrigger { trigger: String, table: String },

    #[error("No trigger given for query on table '{0}'")]
    MissingTrigger(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors produced by a cache store implementation.
#[derive(Debug, Error)]
pub enum CacheStoreError {
    #[error("Invalid key pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),
}

impl ChainError {
    pub fn task_failed(handler: &str, task: &str, source: ChainError) -> Self {
        ChainError::TaskFailed {
            handler: handler.to_string(),
            task: task.to_string(),
            source: Box::new(source),
        }
    }

    /// Innermost error once every handler/task wrapper has been peeled off.
    pub fn root_cause(&self) -> &ChainError {
        match self {
            ChainError::TaskFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self.root_cause(), ChainError::Configuration(_))
    }

    pub fn log_error(&self) {
        match self {
            ChainError::Configuration(e) => {
                error!("Chain configuration error: {}", e);
            }
            ChainError::QueryExecution { task, source } => {
                error!("Query task '{}' failed to execute: {}", task, source);
                debug!("Query execution error details: {:?}", source);
            }
            ChainError::CacheStore(e) => {
                error!("Cache store error: {}", e);
                debug!("Cache store error details: {:?}", e);
            }
            ChainError::CacheInvalidation { table, source } => {
                error!("Cache invalidation for table '{}' failed: {}", table, source);
                debug!("Cache invalidation error details: {:?}", source);
            }
            ChainError::TaskFailed {
                handler,
                task,
                source,
            } => {
                error!("{} query task '{}' failed", handler, task);
                source.log_error();
            }
            ChainError::Unresolved { handler, task } => {
                error!("{} could not resolve query task '{}'", handler, task);
            }
            ChainError::Transaction(e) => {
                error!("Transaction error: {}", e);
            }
        }
    }
}
