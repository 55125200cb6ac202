pub mod institutes;
pub mod models;
pub mod query;
pub mod users;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

pub use institutes::InstituteRepository;
pub use users::UserRepository;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid uuid value for column {0}")]
    InvalidUuid(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Build the single process-wide connection pool. Repositories hold clones
/// of it; nothing else owns database state.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;
    info!("Connected database pool ({} max connections)", config.max_connections);
    Ok(pool)
}

/// Ping the pool to confirm connectivity.
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations. Table defaults (generated ids, active
/// record status, creation stamps) and uniqueness constraints are declared
/// there rather than set per-INSERT.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
