use crate::engine::errors::{ChainError, QueryError};
use crate::engine::handler::{HandlerOutcome, QueryTaskHandler};
use crate::engine::task::QueryTask;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
enum Script {
    Decline,
    Reject,
    Answer(Value),
    Fail(String),
}

/// Hook invocation counts of a scripted handler, shared with the test.
#[derive(Debug, Default)]
pub struct HandlerCounters {
    begins: AtomicUsize,
    finalized: AtomicUsize,
    finalized_with_error: AtomicUsize,
    alternates: AtomicUsize,
    last_error: Mutex<Option<String>>,
    last_result: Mutex<Option<Value>>,
}

impl HandlerCounters {
    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    pub fn finalized(&self) -> usize {
        self.finalized.load(Ordering::SeqCst)
    }

    pub fn finalized_with_error(&self) -> usize {
        self.finalized_with_error.load(Ordering::SeqCst)
    }

    pub fn alternates(&self) -> usize {
        self.alternates.load(Ordering::SeqCst)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    pub fn last_result(&self) -> Option<Value> {
        self.last_result.lock().clone()
    }
}

struct ScriptedHandler {
    name: String,
    script: Script,
    alternate: Option<Value>,
    counters: Arc<HandlerCounters>,
}

impl QueryTaskHandler for ScriptedHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, _task: &QueryTask) -> bool {
        !matches!(self.script, Script::Reject)
    }

    fn begin_processing(&self, task: &mut QueryTask) -> HandlerOutcome {
        self.counters.begins.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Decline | Script::Reject => HandlerOutcome::NotApplicable,
            Script::Answer(value) => HandlerOutcome::Handled(value.clone()),
            Script::Fail(reason) => HandlerOutcome::Failed(ChainError::QueryExecution {
                task: task.display_name().to_string(),
                source: QueryError::Backend(reason.clone()),
            }),
        }
    }

    fn finalize_processing(&self, _task: &mut QueryTask, result: &Value) {
        self.counters.finalized.fetch_add(1, Ordering::SeqCst);
        *self.counters.last_result.lock() = Some(result.clone());
    }

    fn finalize_processing_with_error(&self, task: &QueryTask, error: ChainError) -> ChainError {
        self.counters
            .finalized_with_error
            .fetch_add(1, Ordering::SeqCst);
        *self.counters.last_error.lock() = Some(error.to_string());
        ChainError::task_failed(&self.name, task.display_name(), error)
    }

    fn alternate_processing(&self, task: &mut QueryTask) -> Result<Value, ChainError> {
        self.counters.alternates.fetch_add(1, Ordering::SeqCst);
        self.alternate.clone().ok_or_else(|| ChainError::Unresolved {
            handler: self.name.clone(),
            task: task.display_name().to_string(),
        })
    }
}

pub struct ScriptedHandlerFactory {
    name: String,
    script: Script,
    alternate: Option<Value>,
}

impl ScriptedHandlerFactory {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: Script::Decline,
            alternate: None,
        }
    }

    pub fn declining(mut self) -> Self {
        self.script = Script::Decline;
        self
    }

    pub fn rejecting(mut self) -> Self {
        self.script = Script::Reject;
        self
    }

    pub fn answering(mut self, value: Value) -> Self {
        self.script = Script::Answer(value);
        self
    }

    pub fn failing(mut self, reason: &str) -> Self {
        self.script = Script::Fail(reason.to_string());
        self
    }

    pub fn with_alternate(mut self, value: Value) -> Self {
        self.alternate = Some(value);
        self
    }

    pub fn create(self) -> (Box<dyn QueryTaskHandler>, Arc<HandlerCounters>) {
        let counters = Arc::new(HandlerCounters::default());
        let handler = ScriptedHandler {
            name: self.name,
            script: self.script,
            alternate: self.alternate,
            counters: Arc::clone(&counters),
        };
        (Box::new(handler), counters)
    }
}
