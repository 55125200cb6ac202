use std::collections::BTreeMap;

use serde_json::{Map, Value};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::models::{User, USER_COLUMNS, USER_TABLE, USER_UUID_COLUMNS};
use super::{query, DatabaseError};
use crate::query::filters::record_status;

/// All user persistence. Holds a pool clone; constructed once at startup and
/// shared through application state.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a validated payload, stamping `created_by`. The returned row
    /// never contains the password column.
    pub async fn add(
        &self,
        mut fields: Map<String, Value>,
        actor: &str,
    ) -> Result<Value, DatabaseError> {
        normalize_email(&mut fields);

        let columns: Vec<String> = fields.keys().cloned().collect();
        let sql = query::insert_json_sql(USER_TABLE, &columns, Some("password"))?;

        let mut q = sqlx::query(&sql);
        for column in &columns {
            q = query::bind_column(q, column, &fields[column], USER_UUID_COLUMNS)?;
        }
        q = q.bind(actor);

        let row = q.fetch_one(&self.pool).await?;
        Ok(row.try_get("row")?)
    }

    /// Query users by remapped column filters with a projection string.
    pub async fn find(
        &self,
        filters: &BTreeMap<String, String>,
        projection: &str,
    ) -> Result<Vec<Value>, DatabaseError> {
        let columns = query::projected_columns(projection, USER_COLUMNS);
        let keys: Vec<&str> = filters.keys().map(String::as_str).collect();
        let sql = query::select_json_sql(USER_TABLE, &columns, &keys)?;

        let mut q = sqlx::query(&sql);
        for (key, value) in filters {
            q = query::bind_filter(q, key, value, USER_UUID_COLUMNS)?;
        }

        let rows = q.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<Value, _>("row").map_err(DatabaseError::from))
            .collect()
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
        projection: &str,
    ) -> Result<Option<Value>, DatabaseError> {
        let columns = query::projected_columns(projection, USER_COLUMNS);
        let sql = query::select_json_sql(USER_TABLE, &columns, &["id"])?;

        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.map(|r| r.try_get("row").map_err(DatabaseError::from))
            .transpose()
    }

    /// Login lookup: the full typed row including the password ciphertext,
    /// bypassing the default deselect. Deliberately no record-status
    /// predicate; inactive users can still log in.
    pub async fn find_for_login(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM \"users\" WHERE \"email\" = $1")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Flip the record inactive. The row itself is never removed.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE \"users\" SET \"rec_status\" = $1 WHERE \"id\" = $2")
            .bind(record_status::INACTIVE)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Partial-field merge stamping `updated_by`/`updated_at`. Deliberately
    /// lenient: an unknown id matches zero rows and still resolves Ok.
    pub async fn update(
        &self,
        id: Uuid,
        mut fields: Map<String, Value>,
        actor: &str,
    ) -> Result<(), DatabaseError> {
        normalize_email(&mut fields);

        let columns: Vec<String> = fields.keys().cloned().collect();
        let sql = query::update_sql(USER_TABLE, &columns)?;

        let mut q = sqlx::query(&sql);
        for column in &columns {
            q = query::bind_column(q, column, &fields[column], USER_UUID_COLUMNS)?;
        }
        q = q.bind(actor).bind(id);

        q.execute(&self.pool).await?;
        Ok(())
    }
}

// The store keeps emails lowercased; mirror that before any write.
fn normalize_email(fields: &mut Map<String, Value>) {
    if let Some(Value::String(email)) = fields.get("email") {
        let normalized = email.trim().to_lowercase();
        fields.insert("email".to_string(), Value::String(normalized));
    }
}
