use super::fake_storage::FakeStorage;
use crate::engine::errors::QueryError;
use crate::engine::task::{StaticQuery, triggers};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Static query over one table of `FakeStorage`.
///
/// Without a fixed statement it renders one per trigger, the way a query
/// builder would. A fixed statement is reported for every trigger.
#[derive(Debug)]
pub struct TableQuery {
    storage: Arc<FakeStorage>,
    statement: Option<String>,
    table: String,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl TableQuery {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn render(&self, trigger: &str) -> String {
        let select = format!("select * from {}", self.table);
        match trigger {
            triggers::FIRST => format!("{} limit 1", select),
            triggers::COUNT => format!("select count(*) as aggregate from {}", self.table),
            triggers::EXISTS => format!("select exists({}) as found", select),
            triggers::DOESNT_EXIST => format!("select not exists({}) as missing", select),
            triggers::INSERT => format!("insert into {}", self.table),
            triggers::UPDATE => format!("update {}", self.table),
            triggers::DELETE => format!("delete from {}", self.table),
            _ => select,
        }
    }
}

impl StaticQuery for TableQuery {
    fn invoke(&self, trigger: &str, args: &[Value]) -> Result<Value, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.storage.record_invocation();

        if let Some(reason) = &self.failure {
            return Err(QueryError::Backend(reason.clone()));
        }

        self.storage.with_table(&self.table, |rows| match trigger {
            triggers::GET => Ok(Value::Array(rows.clone())),
            triggers::FIRST => Ok(rows.first().cloned().unwrap_or(Value::Null)),
            triggers::COUNT => Ok(json!(rows.len())),
            triggers::EXISTS => Ok(json!(!rows.is_empty())),
            triggers::DOESNT_EXIST => Ok(json!(rows.is_empty())),
            triggers::INSERT => match args.first() {
                Some(Value::Array(new_rows)) => {
                    rows.extend(new_rows.iter().cloned());
                    Ok(json!(true))
                }
                Some(row @ Value::Object(_)) => {
                    rows.push(row.clone());
                    Ok(json!(true))
                }
                _ => Err(QueryError::InvalidArguments("insert expects rows".into())),
            },
            triggers::UPDATE => match args.first() {
                Some(Value::Object(changes)) => {
                    for row in rows.iter_mut() {
                        if let Value::Object(fields) = row {
                            for (name, value) in changes {
                                fields.insert(name.clone(), value.clone());
                            }
                        }
                    }
                    Ok(json!(rows.len()))
                }
                _ => Err(QueryError::InvalidArguments("update expects an object".into())),
            },
            triggers::DELETE => {
                let removed = rows.len();
                rows.clear();
                Ok(json!(removed))
            }
            other => Err(QueryError::UnknownTrigger {
                trigger: other.to_string(),
                table: self.table.clone(),
            }),
        })
    }

    fn statement_text(&self, trigger: &str) -> String {
        match &self.statement {
            Some(fixed) => fixed.clone(),
            None => self.render(trigger),
        }
    }

    fn table_name(&self) -> String {
        self.table.clone()
    }
}

pub struct TableQueryFactory {
    storage: Arc<FakeStorage>,
    statement: Option<String>,
    table: String,
    failure: Option<String>,
}

impl TableQueryFactory {
    pub fn new(storage: &Arc<FakeStorage>) -> Self {
        Self {
            storage: Arc::clone(storage),
            statement: None,
            table: "users".to_string(),
            failure: None,
        }
    }

    pub fn table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    /// Reports `statement` for every trigger instead of rendering one.
    pub fn statement(mut self, statement: &str) -> Self {
        self.statement = Some(statement.to_string());
        self
    }

    pub fn failing(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_string());
        self
    }

    pub fn create(self) -> Arc<TableQuery> {
        Arc::new(TableQuery {
            storage: self.storage,
            statement: self.statement,
            table: self.table,
            failure: self.failure,
            calls: AtomicUsize::new(0),
        })
    }
}
