pub mod auth;
pub mod institutes;
pub mod users;

use sqlx::PgPool;

use crate::database::{InstituteRepository, UserRepository};

/// Shared application state: the pool plus one repository per entity,
/// constructed once at startup and handed to handlers by axum.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub users: UserRepository,
    pub institutes: InstituteRepository,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            institutes: InstituteRepository::new(pool.clone()),
            pool,
        }
    }
}
