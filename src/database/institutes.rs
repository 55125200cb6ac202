use std::collections::BTreeMap;

use serde_json::{Map, Value};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::models::{INSTITUTE_COLUMNS, INSTITUTE_TABLE, INSTITUTE_UUID_COLUMNS};
use super::{query, DatabaseError};
use crate::query::filters::record_status;

/// All institute persistence.
#[derive(Clone)]
pub struct InstituteRepository {
    pool: PgPool,
}

impl InstituteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn add(
        &self,
        fields: Map<String, Value>,
        actor: &str,
    ) -> Result<Value, DatabaseError> {
        let columns: Vec<String> = fields.keys().cloned().collect();
        let sql = query::insert_json_sql(INSTITUTE_TABLE, &columns, None)?;

        let mut q = sqlx::query(&sql);
        for column in &columns {
            q = query::bind_column(q, column, &fields[column], INSTITUTE_UUID_COLUMNS)?;
        }
        q = q.bind(actor);

        let row = q.fetch_one(&self.pool).await?;
        Ok(row.try_get("row")?)
    }

    pub async fn find(
        &self,
        filters: &BTreeMap<String, String>,
        projection: &str,
    ) -> Result<Vec<Value>, DatabaseError> {
        let columns = query::projected_columns(projection, INSTITUTE_COLUMNS);
        let keys: Vec<&str> = filters.keys().map(String::as_str).collect();
        let sql = query::select_json_sql(INSTITUTE_TABLE, &columns, &keys)?;

        let mut q = sqlx::query(&sql);
        for (key, value) in filters {
            q = query::bind_filter(q, key, value, INSTITUTE_UUID_COLUMNS)?;
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
        let columns = query::projected_columns(projection, INSTITUTE_COLUMNS);
        let sql = query::select_json_sql(INSTITUTE_TABLE, &columns, &["id"])?;

        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.map(|r| r.try_get("row").map_err(DatabaseError::from))
            .transpose()
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE \"institutes\" SET \"rec_status\" = $1 WHERE \"id\" = $2")
            .bind(record_status::INACTIVE)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Lenient like the user update: zero matched rows resolves Ok.
    pub async fn update(
        &self,
        id: Uuid,
        fields: Map<String, Value>,
        actor: &str,
    ) -> Result<(), DatabaseError> {
        let columns: Vec<String> = fields.keys().cloned().collect();
        let sql = query::update_sql(INSTITUTE_TABLE, &columns)?;

        let mut q = sqlx::query(&sql);
        for column in &columns {
            q = query::bind_column(q, column, &fields[column], INSTITUTE_UUID_COLUMNS)?;
        }
        q = q.bind(actor).bind(id);

        q.execute(&self.pool).await?;
        Ok(())
    }
}
