//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use roster_core::error::AppError;
use roster_service::user::admin::{CreateUserRequest, UpdateUserRequest};

use crate::dto::request::{BulkUserIds, CreateUserBody, SearchParams, UpdateUserBody};
use crate::dto::response::{BulkActionResponse, ReplayResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    let result = state
        .admin_user_service
        .list_users(&auth, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/admin/users/search
pub async fn search_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(search): Query<SearchParams>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    let result = state
        .admin_user_service
        .search(&search.query, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateUserBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    validate(&body)?;
    let user = state
        .admin_user_service
        .create_user(
            &auth,
            CreateUserRequest {
                first_name: body.first_name,
                last_name: body.last_name,
                username: body.username,
                email: body.email,
                password: body.password,
                enabled: body.enabled,
                selected_roles: body.selected_roles,
                perms: body.perms,
            },
        )
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": user })))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    let detail = state.admin_user_service.get_user_detail(id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": detail })))
}

/// PUT /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    validate(&body)?;
    let user = state
        .admin_user_service
        .update_user(
            &auth,
            id,
            UpdateUserRequest {
                first_name: body.first_name,
                last_name: body.last_name,
                username: body.username,
                email: body.email,
                enabled: body.enabled,
                password: body.password,
                selected_roles: body.selected_roles,
                perms: body.perms,
            },
        )
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": user })))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    state.admin_user_service.delete_user(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "User deleted" } }),
    ))
}

/// PUT /api/admin/users/{id}/enable
pub async fn enable_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    let user = state.admin_user_service.enable_user(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": user })))
}

/// PUT /api/admin/users/{id}/disable
pub async fn disable_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    let user = state.admin_user_service.disable_user(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": user })))
}

/// PUT /api/admin/users/enable
pub async fn enable_many(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<BulkUserIds>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    validate(&body)?;
    let affected = state
        .admin_user_service
        .enable_many(&auth, &body.ids)
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": BulkActionResponse { affected } }),
    ))
}

/// PUT /api/admin/users/disable
pub async fn disable_many(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<BulkUserIds>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    validate(&body)?;
    let affected = state
        .admin_user_service
        .disable_many(&auth, &body.ids)
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": BulkActionResponse { affected } }),
    ))
}

/// POST /api/admin/users/replay/{audit_id}
///
/// Re-applies the edit recorded in the given audit entry, then returns
/// the updated user together with the role and permission catalogs so
/// the edit screen can be re-displayed.
pub async fn replay_edit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(audit_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    let user = state.replay_service.replay(&auth, audit_id).await?;
    let roles = state.role_repo.find_all().await?;
    let permissions = state.permission_repo.find_all().await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": ReplayResponse { user, roles, permissions },
    })))
}

fn validate(body: &impl Validate) -> Result<(), AppError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))
}
