//! Liveness endpoint.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    sqlx::query("SELECT 1")
        .execute(&state.db_pool)
        .await
        .map_err(|e| {
            roster_core::error::AppError::with_source(
                roster_core::error::ErrorKind::Database,
                "Database ping failed",
                e,
            )
        })?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}
