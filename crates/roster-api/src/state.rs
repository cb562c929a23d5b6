//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use roster_core::config::AppConfig;
use roster_database::repositories::permission::PermissionRepository;
use roster_database::repositories::role::RoleRepository;
use roster_service::audit::AuditService;
use roster_service::user::{AdminUserService, ReplayService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    /// Role catalog repository
    pub role_repo: Arc<RoleRepository>,
    /// Permission catalog repository
    pub permission_repo: Arc<PermissionRepository>,

    /// Admin user management service
    pub admin_user_service: Arc<AdminUserService>,
    /// Audit replay service
    pub replay_service: Arc<ReplayService>,
    /// Audit browsing service
    pub audit_service: Arc<AuditService>,
}
