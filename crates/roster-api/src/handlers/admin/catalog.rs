//! Role and permission catalog handlers.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/roles
pub async fn list_roles(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    let roles = state.role_repo.find_all().await?;
    Ok(Json(serde_json::json!({ "success": true, "data": roles })))
}

/// GET /api/admin/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    let permissions = state.permission_repo.find_all().await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": permissions }),
    ))
}
