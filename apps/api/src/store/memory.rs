//! In-memory `RecordStore` used by handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{Record, RecordStore, StoreError, Table};

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<Table, Vec<Record>>>,
    inserts: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, table: Table) -> Vec<Record> {
        self.tables
            .lock()
            .unwrap()
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn insert_count(&self) -> usize {
        *self.inserts.lock().unwrap()
    }

    fn owned_by(row: &Record, user_id: Uuid, id: Option<Uuid>) -> bool {
        let user_matches = row.get("user_id") == Some(&json!(user_id));
        let id_matches = id.map_or(true, |id| row.get("id") == Some(&json!(id)));
        user_matches && id_matches
    }

    /// Unset-then-set, two separate writes, mirroring a plain request/response backend.
    fn unset_defaults(&self, user_id: Uuid) {
        let mut tables = self.tables.lock().unwrap();
        for row in tables.entry(Table::Resumes).or_default().iter_mut() {
            if Self::owned_by(row, user_id, None) {
                row.insert("is_default".to_string(), json!(false));
            }
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, table: Table, mut record: Record) -> Result<Value, StoreError> {
        *self.inserts.lock().unwrap() += 1;
        record
            .entry("id".to_string())
            .or_insert_with(|| json!(Uuid::new_v4()));
        self.tables
            .lock()
            .unwrap()
            .entry(table)
            .or_default()
            .push(record.clone());
        Ok(Value::Object(record))
    }

    async fn get(&self, table: Table, user_id: Uuid, id: Uuid) -> Result<Option<Value>, StoreError> {
        Ok(self
            .rows(table)
            .into_iter()
            .find(|row| Self::owned_by(row, user_id, Some(id)))
            .map(Value::Object))
    }

    async fn list(&self, table: Table, user_id: Uuid) -> Result<Vec<Value>, StoreError> {
        let mut rows: Vec<Record> = self
            .rows(table)
            .into_iter()
            .filter(|row| Self::owned_by(row, user_id, None))
            .collect();
        rows.sort_by(|a, b| {
            let a = a.get("created_at").and_then(Value::as_str).unwrap_or("");
            let b = b.get("created_at").and_then(Value::as_str).unwrap_or("");
            b.cmp(a)
        });
        Ok(rows.into_iter().map(Value::Object).collect())
    }

    async fn update(
        &self,
        table: Table,
        user_id: Uuid,
        id: Uuid,
        changes: Record,
    ) -> Result<Option<Value>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .entry(table)
            .or_default()
            .iter_mut()
            .find(|row| Self::owned_by(row, user_id, Some(id)));
        Ok(row.map(|row| {
            for (key, value) in changes {
                if !matches!(key.as_str(), "id" | "user_id" | "created_at") {
                    row.insert(key, value);
                }
            }
            Value::Object(row.clone())
        }))
    }

    async fn delete(&self, table: Table, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table).or_default();
        let before = rows.len();
        rows.retain(|row| !Self::owned_by(row, user_id, Some(id)));
        Ok(rows.len() < before)
    }

    async fn set_default_resume(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        if self.get(Table::Resumes, user_id, id).await?.is_none() {
            return Ok(false);
        }
        self.unset_defaults(user_id);

        let mut changes = Record::new();
        changes.insert("is_default".to_string(), json!(true));
        changes.insert("updated_at".to_string(), json!(chrono::Utc::now()));
        Ok(self
            .update(Table::Resumes, user_id, id, changes)
            .await?
            .is_some())
    }
}
