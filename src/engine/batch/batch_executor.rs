use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::results::BatchResults;
use super::transaction::TransactionRunner;
use crate::engine::errors::{ChainError, QueryError};
use crate::engine::handler::{HandlerChainManager, QueryTaskHandler};
use crate::engine::task::{DeferredOutput, Executable, QueryTask, StaticQuery, triggers};

/// Records query tasks and runs them through the handler chain as one
/// transactional unit, feeding earlier results to later tasks.
pub struct BatchExecutor {
    chain: HandlerChainManager,
    transactions: Arc<dyn TransactionRunner>,
    pending: Vec<QueryTask>,
    last_statement: Option<String>,
}

impl BatchExecutor {
    pub fn new(chain: HandlerChainManager, transactions: Arc<dyn TransactionRunner>) -> Self {
        Self {
            chain,
            transactions,
            pending: Vec::new(),
            last_statement: None,
        }
    }

    pub fn chain(&self) -> &HandlerChainManager {
        &self.chain
    }

    /// Puts `handler` in front of the current chain.
    pub fn set_new_root_handler(&mut self, handler: Box<dyn QueryTaskHandler>) {
        self.chain.swap_root_handler(handler);
    }

    /// Queues a task and hands it back so the caller can name it.
    pub fn record_task(
        &mut self,
        executable: Executable,
        trigger: &str,
        method_args: Vec<Value>,
    ) -> &mut QueryTask {
        let task = QueryTask::new(executable, trigger, method_args);
        debug!(
            target: "query_chain::batch",
            trigger,
            position = self.pending.len(),
            "Recorded query task"
        );
        self.pending.push(task);
        let last = self.pending.len() - 1;
        &mut self.pending[last]
    }

    pub fn record_get(&mut self, query: Arc<dyn StaticQuery>) -> &mut QueryTask {
        self.record_task(Executable::Static(query), triggers::GET, Vec::new())
    }

    pub fn record_first(&mut self, query: Arc<dyn StaticQuery>) -> &mut QueryTask {
        self.record_task(Executable::Static(query), triggers::FIRST, Vec::new())
    }

    pub fn record_count(&mut self, query: Arc<dyn StaticQuery>) -> &mut QueryTask {
        self.record_task(Executable::Static(query), triggers::COUNT, Vec::new())
    }

    pub fn record_exists(&mut self, query: Arc<dyn StaticQuery>) -> &mut QueryTask {
        self.record_task(Executable::Static(query), triggers::EXISTS, Vec::new())
    }

    pub fn record_update(&mut self, query: Arc<dyn StaticQuery>, changes: Value) -> &mut QueryTask {
        self.record_task(Executable::Static(query), triggers::UPDATE, vec![changes])
    }

    pub fn record_insert(&mut self, query: Arc<dyn StaticQuery>, rows: Value) -> &mut QueryTask {
        self.record_task(Executable::Static(query), triggers::INSERT, vec![rows])
    }

    /// Queues a callable that runs with the results gathered so far. When it
    /// returns a query, `trigger` is invoked on that query with `method_args`.
    pub fn record_deferred<F>(
        &mut self,
        trigger: &str,
        method_args: Vec<Value>,
        callable: F,
    ) -> &mut QueryTask
    where
        F: Fn(&BatchResults) -> Result<DeferredOutput, QueryError> + Send + Sync + 'static,
    {
        self.record_task(Executable::deferred(callable), trigger, method_args)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> &[QueryTask] {
        &self.pending
    }

    /// Drops every queued task, typically after a failed `run_all`.
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }

    /// Statement of the most recent query that reached storage, including
    /// queries resolved by deferred callables.
    pub fn last_executed_statement(&self) -> Option<&str> {
        self.last_statement.as_deref()
    }

    /// Runs every pending task inside one transaction.
    ///
    /// On success the pending list is cleared and the aggregated results are
    /// returned. On failure the transaction is rolled back, the error is
    /// returned and the pending list is left as it was.
    pub fn run_all(&mut self) -> Result<BatchResults, ChainError> {
        info!(
            target: "query_chain::batch",
            tasks = self.pending.len(),
            "Running query batch"
        );

        let chain = &self.chain;
        let pending = &mut self.pending;
        let last_statement = &mut self.last_statement;
        let outcome = self
            .transactions
            .run(&mut || run_pending(chain, pending, last_statement));

        match outcome {
            Ok(results) => {
                self.pending.clear();
                info!(
                    target: "query_chain::batch",
                    results = results.len(),
                    "Query batch committed"
                );
                Ok(results)
            }
            Err(error) => {
                warn!(target: "query_chain::batch", error = %error, "Query batch aborted");
                error.log_error();
                Err(error)
            }
        }
    }
}

fn run_pending(
    chain: &HandlerChainManager,
    pending: &mut [QueryTask],
    last_statement: &mut Option<String>,
) -> Result<BatchResults, ChainError> {
    let mut results = BatchResults::new();

    for task in pending.iter_mut() {
        if task.is_executed() {
            debug!(
                target: "query_chain::batch",
                task = task.display_name(),
                "Skipping already executed task"
            );
            continue;
        }

        if !results.is_empty() {
            task.set_callback_args(results.clone());
        }

        let value = chain.execute(task)?;

        if task.is_executed() {
            if let Some(signature) = task.signature() {
                *last_statement = Some(signature.statement().to_string());
            }
        }

        results.record(task.key(), value);
    }

    Ok(results)
}
