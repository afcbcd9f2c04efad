use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Record, RecordStore, StoreError, Table};

/// Columns a caller may never write through `update`.
const IMMUTABLE_COLUMNS: &[&str] = &["id", "user_id", "created_at"];

/// PostgreSQL-backed store. Rows are read back as `to_jsonb(row)` so one code
/// path serves every table.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the connection pool and wraps it.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert(&self, table: Table, record: Record) -> Result<Value, StoreError> {
        let columns = column_list(record.keys())?;
        let table = table.as_str();
        // Only the supplied columns are written so omitted ones keep their DB defaults.
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO {table} ({columns})
                SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1)
                RETURNING *
            )
            SELECT to_jsonb(inserted) FROM inserted
            "#
        );

        let row: Value = sqlx::query_scalar(&sql)
            .bind(Value::Object(record))
            .fetch_one(&self.pool)
            .await?;

        debug!("Inserted row into {table}");
        Ok(row)
    }

    async fn get(&self, table: Table, user_id: Uuid, id: Uuid) -> Result<Option<Value>, StoreError> {
        let sql = format!(
            "SELECT to_jsonb(t) FROM {} t WHERE t.id = $1 AND t.user_id = $2",
            table.as_str()
        );
        Ok(sqlx::query_scalar(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self, table: Table, user_id: Uuid) -> Result<Vec<Value>, StoreError> {
        let sql = format!(
            "SELECT to_jsonb(t) FROM {} t WHERE t.user_id = $1 ORDER BY t.created_at DESC",
            table.as_str()
        );
        Ok(sqlx::query_scalar(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update(
        &self,
        table: Table,
        user_id: Uuid,
        id: Uuid,
        mut changes: Record,
    ) -> Result<Option<Value>, StoreError> {
        for column in IMMUTABLE_COLUMNS {
            changes.remove(*column);
        }
        if changes.is_empty() {
            return self.get(table, user_id, id).await;
        }

        let columns = column_list(changes.keys())?;
        let table = table.as_str();
        let sql = format!(
            r#"
            UPDATE {table} AS t
            SET ({columns}) = (SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1))
            WHERE t.id = $2 AND t.user_id = $3
            RETURNING to_jsonb(t.*)
            "#
        );

        Ok(sqlx::query_scalar(&sql)
            .bind(Value::Object(changes))
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete(&self, table: Table, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", table.as_str());
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_default_resume(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        // One conditional statement: no reader can observe zero or two defaults.
        let touched: Vec<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE resumes
            SET is_default = (id = $2),
                updated_at = CASE WHEN id = $2 THEN now() ELSE updated_at END
            WHERE user_id = $1
              AND (is_default OR id = $2)
              AND EXISTS (SELECT 1 FROM resumes WHERE id = $2 AND user_id = $1)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(touched.contains(&id))
    }
}

/// Builds a quoted column list. Keys come from our own serialized records,
/// but are still checked before being spliced into SQL.
fn column_list<'a>(keys: impl Iterator<Item = &'a String>) -> Result<String, StoreError> {
    let mut quoted = Vec::new();
    for key in keys {
        if !is_column_name(key) {
            return Err(StoreError::InvalidColumn(key.clone()));
        }
        quoted.push(format!("\"{key}\""));
    }
    Ok(quoted.join(", "))
}

fn is_column_name(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
