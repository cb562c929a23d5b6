//! Role catalog repository implementation.

use sqlx::PgPool;

use roster_core::error::{AppError, ErrorKind};
use roster_core::result::AppResult;
use roster_entity::role::Role;

/// Repository for the role catalog.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all roles, names ascending.
    pub async fn find_all(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list roles", e))
    }
}
