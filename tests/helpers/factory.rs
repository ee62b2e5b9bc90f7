pub use super::factories::{
    FakeStorage, ScriptedHandlerFactory, SnapshotTransactionRunner, TableQueryFactory,
};

pub struct Factory;

impl Factory {
    pub fn storage() -> std::sync::Arc<FakeStorage> {
        FakeStorage::new()
    }

    pub fn table_query(storage: &std::sync::Arc<FakeStorage>) -> TableQueryFactory {
        TableQueryFactory::new(storage)
    }

    pub fn handler(name: &str) -> ScriptedHandlerFactory {
        ScriptedHandlerFactory::new(name)
    }
}
