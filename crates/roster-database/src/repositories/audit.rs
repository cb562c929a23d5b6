//! Audit log repository implementation.
//!
//! The audit log is append-only: this repository exposes no update or
//! delete operations on purpose.

use sqlx::PgPool;
use uuid::Uuid;

use roster_core::error::{AppError, ErrorKind};
use roster_core::result::AppResult;
use roster_core::types::pagination::{PageRequest, PageResponse};
use roster_entity::audit::{AuditEntry, CreateAuditEntry};

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    /// Create a new audit repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an audit entry by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditEntry>> {
        sqlx::query_as::<_, AuditEntry>("SELECT * FROM audit_log WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find audit entry", e)
            })
    }

    /// Append an audit log entry.
    pub async fn append(&self, data: &CreateAuditEntry) -> AppResult<AuditEntry> {
        sqlx::query_as::<_, AuditEntry>(
            "INSERT INTO audit_log (actor_id, category, description, replay_action, data) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.actor_id)
        .bind(&data.category)
        .bind(&data.description)
        .bind(&data.replay_action)
        .bind(&data.data)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append audit entry", e))
    }

    /// List audit entries with pagination, newest first.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<AuditEntry>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count audit entries", e)
            })?;

        let entries = sqlx::query_as::<_, AuditEntry>(
            "SELECT * FROM audit_log ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list audit entries", e)
        })?;

        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
