use serde_json::Value;

use super::executable::Executable;
use super::signature::Signature;
use crate::engine::batch::BatchResults;
use crate::engine::errors::QueryError;

/// Name reported for tasks that were never given a key.
pub const ANONYMOUS_TASK: &str = "<anonymous>";

/// One deferred query plus the bookkeeping the chain and the batch executor need.
///
/// The executable, trigger and method arguments are fixed at construction.
/// Callback arguments are injected by the batch executor and the executed flag
/// only ever moves from `false` to `true`.
#[derive(Debug)]
pub struct QueryTask {
    key: String,
    executable: Executable,
    trigger: String,
    method_args: Vec<Value>,
    callback_args: BatchResults,
    executed: bool,
    resolved: Option<Signature>,
}

impl QueryTask {
    pub fn new(executable: Executable, trigger: impl Into<String>, method_args: Vec<Value>) -> Self {
        Self {
            key: String::new(),
            executable,
            trigger: trigger.into(),
            method_args,
            callback_args: BatchResults::new(),
            executed: false,
            resolved: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Names the task so its result lands under this key in the batch output.
    pub fn set_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_anonymous(&self) -> bool {
        self.key.is_empty()
    }

    pub fn display_name(&self) -> &str {
        if self.key.is_empty() {
            ANONYMOUS_TASK
        } else {
            &self.key
        }
    }

    pub fn executable(&self) -> &Executable {
        &self.executable
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn method_args(&self) -> &[Value] {
        &self.method_args
    }

    pub fn callback_args(&self) -> &BatchResults {
        &self.callback_args
    }

    pub fn set_callback_args(&mut self, args: BatchResults) {
        self.callback_args = args;
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub fn mark_executed(&mut self) {
        self.executed = true;
    }

    /// Signature of the query this task sends to storage. Before a run only
    /// static queries have one; after a run it is the query that actually
    /// ran, which covers deferred callables that resolved to a query.
    pub fn signature(&self) -> Option<Signature> {
        self.resolved
            .clone()
            .or_else(|| self.executable.signature(&self.trigger))
    }

    pub fn run(&mut self) -> Result<Value, QueryError> {
        let evaluation =
            self.executable
                .evaluate(&self.trigger, &self.method_args, &self.callback_args)?;
        self.resolved = evaluation.signature;
        Ok(evaluation.value)
    }
}
