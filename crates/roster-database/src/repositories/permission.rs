//! Permission catalog repository implementation.

use sqlx::PgPool;

use roster_core::error::{AppError, ErrorKind};
use roster_core::result::AppResult;
use roster_entity::permission::Permission;

/// Repository for the permission catalog.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all permissions, names ascending.
    pub async fn find_all(&self) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list permissions", e)
            })
    }
}
