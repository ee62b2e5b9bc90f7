use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use super::results::BatchResults;
use crate::engine::errors::ChainError;

pub type TransactionWork<'a> = dyn FnMut() -> Result<BatchResults, ChainError> + 'a;

/// Runs a unit of work all-or-nothing: when `work` fails, every
/// storage-visible effect it produced must be rolled back before the error
/// is returned.
pub trait TransactionRunner: Send + Sync {
    fn run(&self, work: &mut TransactionWork<'_>) -> Result<BatchResults, ChainError>;
}

/// Pass-through runner for storage that manages its own atomicity.
/// It only traces transaction boundaries.
#[derive(Debug, Default)]
pub struct LoggingTransactionRunner {
    next_id: AtomicU64,
}

impl LoggingTransactionRunner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionRunner for LoggingTransactionRunner {
    fn run(&self, work: &mut TransactionWork<'_>) -> Result<BatchResults, ChainError> {
        let tx_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(target: "query_chain::batch", tx_id, "Transaction begin");

        match work() {
            Ok(results) => {
                debug!(target: "query_chain::batch", tx_id, results = results.len(), "Transaction commit");
                Ok(results)
            }
            Err(error) => {
                warn!(target: "query_chain::batch", tx_id, error = %error, "Transaction rollback");
                Err(error)
            }
        }
    }
}
