use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::signature::Signature;
use crate::engine::batch::BatchResults;
use crate::engine::errors::QueryError;

/// A query whose statement is known up front.
pub trait StaticQuery: Send + Sync {
    /// Runs the named operation (`get`, `first`, `update`, ...) against storage.
    fn invoke(&self, trigger: &str, args: &[Value]) -> Result<Value, QueryError>;

    /// Statement sent to storage when `trigger` is invoked. Cached results are
    /// keyed on it, so each trigger must render its own statement: `count`
    /// and `get` differ, and a mutating trigger renders a mutating statement.
    fn statement_text(&self, trigger: &str) -> String;

    fn table_name(&self) -> String;
}

/// What a deferred callable hands back: either a finished result, or a query
/// on which the task's trigger still has to be invoked.
pub enum DeferredOutput {
    Value(Value),
    Query(Arc<dyn StaticQuery>),
}

pub type DeferredFn = dyn Fn(&BatchResults) -> Result<DeferredOutput, QueryError> + Send + Sync;

/// Result of evaluating an executable, plus the signature of the query that
/// produced it when one ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: Value,
    pub signature: Option<Signature>,
}

#[derive(Clone)]
pub enum Executable {
    Static(Arc<dyn StaticQuery>),
    Deferred(Arc<DeferredFn>),
}

impl Executable {
    pub fn deferred<F>(callable: F) -> Self
    where
        F: Fn(&BatchResults) -> Result<DeferredOutput, QueryError> + Send + Sync + 'static,
    {
        Executable::Deferred(Arc::new(callable))
    }

    /// `statement|table` shape of a static query under `trigger`. Deferred
    /// callables have none because their query is only known once they run.
    pub fn signature(&self, trigger: &str) -> Option<Signature> {
        match self {
            Executable::Static(query) => signature_of(query.as_ref(), trigger),
            Executable::Deferred(_) => None,
        }
    }

    pub fn statement_text(&self, trigger: &str) -> Option<String> {
        match self {
            Executable::Static(query) => Some(query.statement_text(trigger)),
            Executable::Deferred(_) => None,
        }
    }

    pub fn evaluate(
        &self,
        trigger: &str,
        method_args: &[Value],
        callback_args: &BatchResults,
    ) -> Result<Evaluation, QueryError> {
        match self {
            Executable::Static(query) => run_query(query.as_ref(), trigger, method_args),
            Executable::Deferred(callable) => match callable(callback_args)? {
                DeferredOutput::Value(value) => Ok(Evaluation {
                    value,
                    signature: None,
                }),
                DeferredOutput::Query(query) => run_query(query.as_ref(), trigger, method_args),
            },
        }
    }
}

fn signature_of(query: &dyn StaticQuery, trigger: &str) -> Option<Signature> {
    Signature::new(query.statement_text(trigger), query.table_name())
}

fn run_query(
    query: &dyn StaticQuery,
    trigger: &str,
    method_args: &[Value],
) -> Result<Evaluation, QueryError> {
    if trigger.is_empty() {
        return Err(QueryError::MissingTrigger(query.table_name()));
    }
    let value = query.invoke(trigger, method_args)?;
    Ok(Evaluation {
        value,
        signature: signature_of(query, trigger),
    })
}

impl fmt::Debug for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Executable::Static(query) => f
                .debug_struct("Static")
                .field("table", &query.table_name())
                .finish(),
            Executable::Deferred(_) => f.write_str("Deferred(<callable>)"),
        }
    }
}
