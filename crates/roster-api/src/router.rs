//! Route table.

use axum::Router;
use axum::routing::{get, post, put};

use crate::handlers::admin::audit::{get_audit, list_audit};
use crate::handlers::admin::catalog::{list_permissions, list_roles};
use crate::handlers::admin::users::{
    create_user, delete_user, disable_many, disable_user, enable_many, enable_user, get_user,
    list_users, replay_edit, search_users, update_user,
};
use crate::handlers::health::health;
use crate::state::AppState;

/// Builds the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/search", get(search_users))
        // Static segments take precedence over the {id} capture below.
        .route("/users/enable", put(enable_many))
        .route("/users/disable", put(disable_many))
        .route("/users/replay/{audit_id}", post(replay_edit))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{id}/enable", put(enable_user))
        .route("/users/{id}/disable", put(disable_user))
        .route("/audit", get(list_audit))
        .route("/audit/{id}", get(get_audit))
        .route("/roles", get(list_roles))
        .route("/permissions", get(list_permissions));

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/admin", admin)
        .with_state(state)
}
