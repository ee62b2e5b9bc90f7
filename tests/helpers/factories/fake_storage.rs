use crate::engine::batch::{BatchResults, TransactionRunner, TransactionWork};
use crate::engine::errors::ChainError;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Table rows kept in memory, standing in for a real database in tests.
#[derive(Debug, Default)]
pub struct FakeStorage {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    invocations: AtomicUsize,
}

impl FakeStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables.lock().insert(table.to_string(), rows);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.lock().get(table).cloned().unwrap_or_default()
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    pub(crate) fn record_invocation(&self) {
        self.invocations.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn with_table<R>(&self, table: &str, f: impl FnOnce(&mut Vec<Value>) -> R) -> R {
        let mut guard = self.tables.lock();
        f(guard.entry(table.to_string()).or_default())
    }

    fn snapshot(&self) -> HashMap<String, Vec<Value>> {
        self.tables.lock().clone()
    }

    fn restore(&self, snapshot: HashMap<String, Vec<Value>>) {
        *self.tables.lock() = snapshot;
    }
}

/// Transaction runner that restores the fake storage on failure.
#[derive(Debug)]
pub struct SnapshotTransactionRunner {
    storage: Arc<FakeStorage>,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl SnapshotTransactionRunner {
    pub fn new(storage: &Arc<FakeStorage>) -> Arc<Self> {
        Arc::new(Self {
            storage: Arc::clone(storage),
            commits: AtomicUsize::new(0),
            rollbacks: AtomicUsize::new(0),
        })
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

impl TransactionRunner for SnapshotTransactionRunner {
    fn run(&self, work: &mut TransactionWork<'_>) -> Result<BatchResults, ChainError> {
        let snapshot = self.storage.snapshot();
        match work() {
            Ok(results) => {
                self.commits.fetch_add(1, Ordering::SeqCst);
                Ok(results)
            }
            Err(err) => {
                self.storage.restore(snapshot);
                self.rollbacks.fetch_add(1, Ordering::SeqCst);
                Err(err)
            }
        }
    }
}
