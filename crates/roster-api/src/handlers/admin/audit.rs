//! Audit log browsing handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/audit
pub async fn list_audit(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    let result = state.audit_service.list(params.into_page_request()).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/admin/audit/{id}
pub async fn get_audit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    let entry = state.audit_service.get(id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": entry })))
}
