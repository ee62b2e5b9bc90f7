//! Query-task dispatch pipeline.
//!
//! A [`HandlerChainManager`](engine::handler::HandlerChainManager) routes each
//! [`QueryTask`](engine::task::QueryTask) through a chain of handlers (a
//! read-through cache in front of real storage by default), and a
//! [`BatchExecutor`](engine::batch::BatchExecutor) runs a sequence of tasks
//! inside one transaction, feeding earlier results to later tasks.

pub mod engine;
pub mod logging;
pub mod shared;

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
pub mod test_helpers;
