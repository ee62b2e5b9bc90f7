mod cache_handler;
mod chain_manager;
mod query_task_handler;
mod storage_handler;


pub use cache_handler::CacheHandler;
pub use chain_manager::HandlerChainManager;
pub use query_task_handler::{HandlerOutcome, QueryTaskHandler};
pub use storage_handler::StorageHandler;
