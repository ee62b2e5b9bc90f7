pub mod fake_storage;
pub mod scripted_handler_factory;
pub mod table_query_factory;


pub use fake_storage::{FakeStorage, SnapshotTransactionRunner};
pub use scripted_handler_factory::{HandlerCounters, ScriptedHandlerFactory};
pub use table_query_factory::{TableQuery, TableQueryFactory};
