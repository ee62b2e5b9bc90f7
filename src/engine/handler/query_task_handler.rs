use serde_json::Value;

use crate::engine::errors::ChainError;
use crate::engine::task::QueryTask;

/// Result of a handler's own attempt at a task.
#[derive(Debug)]
pub enum HandlerOutcome {
    /// The handler produced the task's result.
    Handled(Value),
    /// Not this handler's job; the chain tries the next one.
    NotApplicable,
    /// A genuine failure. Never delegated.
    Failed(ChainError),
}

/// One link of the query chain.
///
/// The chain manager drives the hooks: `begin_processing` first, then
/// `finalize_processing` after any successful result (produced here or
/// further down the chain) or `finalize_processing_with_error` before a
/// failure leaves this handler. `alternate_processing` is only attempted when
/// this handler declined the task and nothing follows it.
pub trait QueryTaskHandler: Send + Sync {
    fn name(&self) -> &str;

    /// Filters the task kinds this handler understands. A rejected task is
    /// treated exactly like `HandlerOutcome::NotApplicable`.
    fn accepts(&self, _task: &QueryTask) -> bool {
        true
    }

    fn begin_processing(&self, task: &mut QueryTask) -> HandlerOutcome;

    /// Side effects after a successful result. Must not fail the task.
    fn finalize_processing(&self, task: &mut QueryTask, result: &Value);

    /// Sees every failure before it crosses this handler and returns the
    /// error to propagate, usually wrapped with handler and task context.
    fn finalize_processing_with_error(&self, task: &QueryTask, error: ChainError) -> ChainError;

    fn alternate_processing(&self, task: &mut QueryTask) -> Result<Value, ChainError>;
}
