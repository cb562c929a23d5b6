//! Store traits — the seam between services and concrete repositories.
//!
//! Services depend on these traits rather than on the sqlx-backed
//! structs, so business logic can be exercised against in-memory
//! implementations without a live database.

use async_trait::async_trait;
use uuid::Uuid;

use roster_core::result::AppResult;
use roster_core::types::pagination::{PageRequest, PageResponse};
use roster_entity::audit::{AuditEntry, CreateAuditEntry};
use roster_entity::permission::Permission;
use roster_entity::role::Role;
use roster_entity::user::{CreateUser, User};

use super::audit::AuditRepository;
use super::user::UserRepository;

/// User persistence operations consumed by the service layer.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users with pagination, usernames ascending.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>>;

    /// Search users by first name, last name, or username.
    async fn search(&self, query: &str, page: &PageRequest) -> AppResult<PageResponse<User>>;

    /// Create a new user.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Persist the five profile scalars of an already-loaded user.
    async fn update_profile(&self, user: &User) -> AppResult<User>;

    /// Update a user's password hash.
    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Set a user's enabled flag.
    async fn set_enabled(&self, user_id: Uuid, enabled: bool) -> AppResult<User>;

    /// Delete a user by ID.
    async fn delete(&self, user_id: Uuid) -> AppResult<bool>;

    /// List a user's role memberships, names ascending.
    async fn roles_of(&self, user_id: Uuid) -> AppResult<Vec<Role>>;

    /// List a user's direct permission grants, names ascending.
    async fn permissions_of(&self, user_id: Uuid) -> AppResult<Vec<Permission>>;

    /// Batched role lookup for a page of users.
    async fn roles_for_users(&self, user_ids: &[Uuid]) -> AppResult<Vec<(Uuid, Role)>>;

    /// Full-replace sync of a user's role memberships.
    async fn sync_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> AppResult<()>;

    /// Full-replace sync of a user's direct permission grants.
    async fn sync_permissions(&self, user_id: Uuid, perm_ids: &[Uuid]) -> AppResult<()>;
}

/// Audit log operations consumed by the service layer.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Find an audit entry by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditEntry>>;

    /// Append an audit log entry.
    async fn append(&self, data: &CreateAuditEntry) -> AppResult<AuditEntry>;

    /// List audit entries with pagination, newest first.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<AuditEntry>>;
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserRepository::find_by_id(self, id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        UserRepository::find_by_username(self, username).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserRepository::find_by_email(self, email).await
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        UserRepository::find_all(self, page).await
    }

    async fn search(&self, query: &str, page: &PageRequest) -> AppResult<PageResponse<User>> {
        UserRepository::search(self, query, page).await
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        UserRepository::create(self, data).await
    }

    async fn update_profile(&self, user: &User) -> AppResult<User> {
        UserRepository::update_profile(self, user).await
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<()> {
        UserRepository::update_password(self, user_id, password_hash).await
    }

    async fn set_enabled(&self, user_id: Uuid, enabled: bool) -> AppResult<User> {
        UserRepository::set_enabled(self, user_id, enabled).await
    }

    async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        UserRepository::delete(self, user_id).await
    }

    async fn roles_of(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        UserRepository::roles_of(self, user_id).await
    }

    async fn permissions_of(&self, user_id: Uuid) -> AppResult<Vec<Permission>> {
        UserRepository::permissions_of(self, user_id).await
    }

    async fn roles_for_users(&self, user_ids: &[Uuid]) -> AppResult<Vec<(Uuid, Role)>> {
        UserRepository::roles_for_users(self, user_ids).await
    }

    async fn sync_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> AppResult<()> {
        UserRepository::sync_roles(self, user_id, role_ids).await
    }

    async fn sync_permissions(&self, user_id: Uuid, perm_ids: &[Uuid]) -> AppResult<()> {
        UserRepository::sync_permissions(self, user_id, perm_ids).await
    }
}

#[async_trait]
impl AuditStore for AuditRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditEntry>> {
        AuditRepository::find_by_id(self, id).await
    }

    async fn append(&self, data: &CreateAuditEntry) -> AppResult<AuditEntry> {
        AuditRepository::append(self, data).await
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<AuditEntry>> {
        AuditRepository::find_all(self, page).await
    }
}
