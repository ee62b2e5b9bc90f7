use serde_json::Value;
use tracing::{debug, trace};

use super::query_task_handler::{HandlerOutcome, QueryTaskHandler};
use crate::engine::errors::ChainError;
use crate::engine::task::QueryTask;

/// Owns the ordered handler chain. Index 0 is the root.
pub struct HandlerChainManager {
    handlers: Vec<Box<dyn QueryTaskHandler>>,
}

impl HandlerChainManager {
    pub fn new(handlers: Vec<Box<dyn QueryTaskHandler>>) -> Result<Self, ChainError> {
        if handlers.is_empty() {
            return Err(ChainError::Configuration(
                "Cannot proceed: no storage query task handlers found".to_string(),
            ));
        }
        debug!(
            target: "query_chain::chain",
            handlers = ?handlers.iter().map(|h| h.name()).collect::<Vec<_>>(),
            "Handler chain built"
        );
        Ok(Self { handlers })
    }

    pub fn execute(&self, task: &mut QueryTask) -> Result<Value, ChainError> {
        self.handle_at(0, task)
    }

    /// Splices `handler` in front of the existing chain.
    pub fn swap_root_handler(&mut self, handler: Box<dyn QueryTaskHandler>) {
        debug!(
            target: "query_chain::chain",
            new_root = handler.name(),
            former_root = self.root_name(),
            "Swapping root handler"
        );
        self.handlers.insert(0, handler);
    }

    pub fn depth(&self) -> usize {
        self.handlers.len()
    }

    pub fn root_name(&self) -> &str {
        self.handlers[0].name()
    }

    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    fn handle_at(&self, index: usize, task: &mut QueryTask) -> Result<Value, ChainError> {
        let handler = &self.handlers[index];
        let next = index + 1;

        let outcome = if handler.accepts(task) {
            handler.begin_processing(task)
        } else {
            HandlerOutcome::NotApplicable
        };

        match outcome {
            HandlerOutcome::Handled(value) => {
                trace!(
                    target: "query_chain::chain",
                    handler = handler.name(),
                    task = task.display_name(),
                    "Task handled"
                );
                handler.finalize_processing(task, &value);
                Ok(value)
            }
            HandlerOutcome::NotApplicable if next < self.handlers.len() => {
                trace!(
                    target: "query_chain::chain",
                    handler = handler.name(),
                    next = self.handlers[next].name(),
                    task = task.display_name(),
                    "Delegating task"
                );
                match self.handle_at(next, task) {
                    Ok(value) => {
                        handler.finalize_processing(task, &value);
                        Ok(value)
                    }
                    Err(error) => Err(handler.finalize_processing_with_error(task, error)),
                }
            }
            HandlerOutcome::NotApplicable => {
                let error = ChainError::Configuration(format!(
                    "Cannot skip; next handler after this handler: '{}' is missing",
                    handler.name()
                ));
                let reported = handler.finalize_processing_with_error(task, error);
                debug!(
                    target: "query_chain::chain",
                    handler = handler.name(),
                    error = %reported,
                    "Terminal handler declined task, trying alternate processing"
                );
                handler.alternate_processing(task)
            }
            HandlerOutcome::Failed(error) => {
                Err(handler.finalize_processing_with_error(task, error))
            }
        }
    }
}
