use serde_json::Value;
use tracing::{debug, error};

use super::query_task_handler::{HandlerOutcome, QueryTaskHandler};
use crate::engine::errors::ChainError;
use crate::engine::task::QueryTask;

const HANDLER_NAME: &str = "Storage";

/// Terminal link: runs the task against real storage.
#[derive(Debug, Default)]
pub struct StorageHandler;

impl StorageHandler {
    pub fn new() -> Self {
        Self
    }
}

impl QueryTaskHandler for StorageHandler {
    fn name(&self) -> &str {
        HANDLER_NAME
    }

    fn begin_processing(&self, task: &mut QueryTask) -> HandlerOutcome {
        match task.run() {
            Ok(value) => {
                task.mark_executed();
                debug!(
                    target: "query_chain::storage",
                    task = task.display_name(),
                    trigger = task.trigger(),
                    "Query task executed"
                );
                HandlerOutcome::Handled(value)
            }
            Err(source) => HandlerOutcome::Failed(ChainError::QueryExecution {
                task: task.display_name().to_string(),
                source,
            }),
        }
    }

    fn finalize_processing(&self, task: &mut QueryTask, _result: &Value) {
        if !task.is_executed() {
            task.mark_executed();
        }
    }

    fn finalize_processing_with_error(&self, task: &QueryTask, err: ChainError) -> ChainError {
        error!(
            target: "query_chain::storage",
            task = task.display_name(),
            error = %err,
            "Storage query task failed"
        );
        ChainError::task_failed(HANDLER_NAME, task.display_name(), err)
    }

    fn alternate_processing(&self, task: &mut QueryTask) -> Result<Value, ChainError> {
        Err(ChainError::Unresolved {
            handler: HANDLER_NAME.to_string(),
            task: task.display_name().to_string(),
        })
    }
}
