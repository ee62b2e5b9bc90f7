mod batch_executor;
mod results;
mod transaction;


pub use batch_executor::BatchExecutor;
pub use results::{BatchResults, ResultKey};
pub use transaction::{LoggingTransactionRunner, TransactionRunner, TransactionWork};
