//! Record store: the persistence boundary for all tracked entities.
//!
//! Records cross this boundary as JSON objects. Callers normalize into a typed
//! record, serialize it (absent optional fields are omitted, not nulled), and
//! read rows back by deserializing into the typed `*Row` models.
//!
//! `AppState` holds an `Arc<dyn RecordStore>`; production uses `PgStore`.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod pg;

pub use pg::PgStore;

pub type Record = Map<String, Value>;

/// Tables owned by a single user through their `user_id` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Applications,
    Interviews,
    Events,
    Surveys,
    Resumes,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Table::Applications => "applications",
            Table::Interviews => "interviews",
            Table::Events => "events",
            Table::Surveys => "surveys",
            Table::Resumes => "resumes",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("row decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid column name '{0}'")]
    InvalidColumn(String),

    #[error("record did not encode to a JSON object")]
    NotAnObject,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts one record and returns the stored row.
    async fn insert(&self, table: Table, record: Record) -> Result<Value, StoreError>;

    async fn get(&self, table: Table, user_id: Uuid, id: Uuid) -> Result<Option<Value>, StoreError>;

    /// All rows for a user, newest `created_at` first. Not paginated.
    async fn list(&self, table: Table, user_id: Uuid) -> Result<Vec<Value>, StoreError>;

    /// Writes only the columns present in `changes`. Returns `None` when no row matched.
    async fn update(
        &self,
        table: Table,
        user_id: Uuid,
        id: Uuid,
        changes: Record,
    ) -> Result<Option<Value>, StoreError>;

    /// Deletes by id. Child rows referencing the id are left in place.
    async fn delete(&self, table: Table, user_id: Uuid, id: Uuid) -> Result<bool, StoreError>;

    /// Makes `id` the user's only default resume. Returns `false` if `id` is not theirs.
    async fn set_default_resume(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError>;
}

/// Encodes a typed record into the JSON object the store writes.
pub fn encode_record<T: serde::Serialize>(record: &T) -> Result<Record, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

/// Decodes store rows into a typed model.
pub fn decode_rows<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(StoreError::from))
        .collect()
}
