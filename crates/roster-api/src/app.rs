//! Application builder — wires router + middleware + state into an Axum app.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use roster_core::config::AppConfig;
use roster_core::config::server::CorsConfig;
use roster_core::error::AppError;
use roster_database::repositories::audit::AuditRepository;
use roster_database::repositories::permission::PermissionRepository;
use roster_database::repositories::role::RoleRepository;
use roster_database::repositories::store::{AuditStore, UserStore};
use roster_database::repositories::user::UserRepository;
use roster_service::audit::AuditService;
use roster_service::password::{PasswordHasher, PasswordValidator};
use roster_service::policy::{ProtectedUserPolicy, UserPolicy};
use roster_service::user::{AdminUserService, ReplayService};

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(build_compression_layer())
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Builds the shared application state from configuration and a pool.
pub fn build_state(config: AppConfig, db_pool: PgPool) -> AppState {
    let user_repo: Arc<dyn UserStore> = Arc::new(UserRepository::new(db_pool.clone()));
    let role_repo = Arc::new(RoleRepository::new(db_pool.clone()));
    let permission_repo = Arc::new(PermissionRepository::new(db_pool.clone()));
    let audit_repo: Arc<dyn AuditStore> = Arc::new(AuditRepository::new(db_pool.clone()));

    let hasher = Arc::new(PasswordHasher::new());
    let validator = Arc::new(PasswordValidator::new(&config.auth));
    let policy: Arc<dyn UserPolicy> =
        Arc::new(ProtectedUserPolicy::new(config.auth.protected_usernames.clone()));

    let admin_user_service = Arc::new(AdminUserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&audit_repo),
        hasher,
        validator,
        Arc::clone(&policy),
    ));
    let replay_service = Arc::new(ReplayService::new(
        Arc::clone(&audit_repo),
        Arc::clone(&user_repo),
        Arc::clone(&policy),
    ));
    let audit_service = Arc::new(AuditService::new(Arc::clone(&audit_repo)));

    AppState {
        config: Arc::new(config),
        db_pool,
        role_repo,
        permission_repo,
        admin_user_service,
        replay_service,
        audit_service,
    }
}

/// Runs the Roster server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let cors_config = config.server.cors.clone();

    let state = build_state(config, db_pool);
    let app = build_app(state, &cors_config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Roster server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
    }
    tracing::info!("Shutdown signal received");
}
