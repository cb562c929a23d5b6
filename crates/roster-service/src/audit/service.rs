//! Read access to the audit log.

use std::sync::Arc;

use uuid::Uuid;

use roster_core::error::AppError;
use roster_core::types::pagination::{PageRequest, PageResponse};
use roster_database::repositories::store::AuditStore;
use roster_entity::audit::AuditEntry;

/// Serves the audit log, newest entries first.
#[derive(Clone)]
pub struct AuditService {
    /// Audit log store.
    audit_repo: Arc<dyn AuditStore>,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(audit_repo: Arc<dyn AuditStore>) -> Self {
        Self { audit_repo }
    }

    /// Lists audit entries with pagination, newest first.
    pub async fn list(&self, page: PageRequest) -> Result<PageResponse<AuditEntry>, AppError> {
        self.audit_repo.find_all(&page).await
    }

    /// Gets a single audit entry by ID.
    pub async fn get(&self, audit_id: Uuid) -> Result<AuditEntry, AppError> {
        self.audit_repo
            .find_by_id(audit_id)
            .await?
            .ok_or_else(|| AppError::not_found("Audit entry not found"))
    }
}
