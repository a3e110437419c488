//! # In-Memory Record Store
//!
//! HashMap-backed [`RecordStore`] used two ways: as the offline stand-in
//! when no database can be opened (every call failing `Unavailable` drives
//! the gateway onto its seed data), and as the test fixture with injectable
//! failures and an operation log.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::error::{StoreError, StoreErrorKind};
use super::store::RecordStore;

#[derive(Default)]
pub struct MemoryRecordStore {
    tables: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    fail_next: Mutex<Option<StoreError>>,
    fail_always: Mutex<Option<StoreError>>,
    ops: Mutex<Vec<String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses every call, simulating an unreachable backend
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.fail_always(StoreError::new(
            StoreErrorKind::Unavailable,
            "record store unreachable",
        ));
        store
    }

    /// Fail only the next operation with the given error
    pub fn fail_next(&self, err: StoreError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    /// Fail every operation with the given error
    pub fn fail_always(&self, err: StoreError) {
        *self.fail_always.lock().unwrap() = Some(err);
    }

    /// Stop failing operations
    pub fn recover(&self) {
        *self.fail_always.lock().unwrap() = None;
        *self.fail_next.lock().unwrap() = None;
    }

    /// Pre-populate a table with records keyed by their `id` field
    pub fn seed_table(&self, table: &str, records: Vec<Value>) {
        let mut tables = self.tables.lock().unwrap();
        let entries = tables.entry(table.to_string()).or_default();
        for record in records {
            let id = record["id"].as_str().unwrap_or_default().to_string();
            entries.insert(id, record);
        }
    }

    /// Current contents of a table, for assertions
    pub fn table(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Every mutating/reading call recorded as `"<op> <table> <id>"`
    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    /// Only the write operations (upsert/delete) from the log
    pub fn write_ops(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter(|op| op.starts_with("upsert") || op.starts_with("delete"))
            .collect()
    }

    fn check_failure(&self, op: String) -> Result<(), StoreError> {
        self.ops.lock().unwrap().push(op);
        if let Some(err) = self.fail_next.lock().unwrap().take() {
            return Err(err);
        }
        if let Some(err) = self.fail_always.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn fetch_all(&self, table: &str) -> Result<Vec<Value>, StoreError> {
        self.check_failure(format!("fetch_all {}", table))?;
        Ok(self.table(table))
    }

    async fn fetch_one(&self, table: &str, id: &str) -> Result<Value, StoreError> {
        self.check_failure(format!("fetch_one {} {}", table, id))?;
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .and_then(|entries| entries.get(id).cloned())
            .ok_or_else(|| {
                StoreError::new(
                    StoreErrorKind::RowMissing,
                    format!("no row with id {} in {}", id, table),
                )
            })
    }

    async fn upsert(&self, table: &str, id: &str, record: Value) -> Result<(), StoreError> {
        self.check_failure(format!("upsert {} {}", table, id))?;
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .insert(id.to_string(), record);
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        self.check_failure(format!("delete {} {}", table, id))?;
        if let Some(entries) = self.tables.lock().unwrap().get_mut(table) {
            entries.remove(id);
        }
        Ok(())
    }
}
