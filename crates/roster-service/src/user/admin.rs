//! Admin user management — CRUD, enable/disable, search.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use roster_core::error::AppError;
use roster_core::types::pagination::{PageRequest, PageResponse};
use roster_database::repositories::store::{AuditStore, UserStore};
use roster_entity::audit::CreateAuditEntry;
use roster_entity::audit::snapshot::parse_selected_roles;
use roster_entity::permission::Permission;
use roster_entity::role::Role;
use roster_entity::user::{CreateUser, User, UserWithRoles};

use crate::context::RequestContext;
use crate::password::{PasswordHasher, PasswordValidator};
use crate::policy::UserPolicy;

/// Audit category for all admin user operations.
pub const AUDIT_CATEGORY: &str = "Admin users";

/// Replay action identifier recorded on audited edits.
pub const REPLAY_EDIT_ACTION: &str = "admin.users.replay-edit";

/// Handles administrative user management operations.
#[derive(Clone)]
pub struct AdminUserService {
    /// User store.
    user_repo: Arc<dyn UserStore>,
    /// Audit log store.
    audit_repo: Arc<dyn AuditStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password validator.
    validator: Arc<PasswordValidator>,
    /// Mutation policy.
    policy: Arc<dyn UserPolicy>,
}

/// Request to create a new user.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateUserRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Username (unique).
    pub username: String,
    /// Email (unique).
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Initial enabled state.
    pub enabled: bool,
    /// Comma-separated role ids, as the edit form submits them.
    pub selected_roles: Option<String>,
    /// Direct permission grants.
    pub perms: Option<Vec<Uuid>>,
}

/// Request to update an existing user.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UpdateUserRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Enabled state.
    pub enabled: bool,
    /// New password, if the edit changes it. Never recorded in the
    /// replay snapshot.
    pub password: Option<String>,
    /// Comma-separated role ids; absent means "leave roles untouched".
    pub selected_roles: Option<String>,
    /// Permission grants; absent means "leave permissions untouched".
    pub perms: Option<Vec<Uuid>>,
}

/// A user with its full membership, as shown on the show/edit screens.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserDetail {
    /// The user record.
    pub user: User,
    /// Role memberships.
    pub roles: Vec<Role>,
    /// Direct permission grants.
    pub permissions: Vec<Permission>,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(
        user_repo: Arc<dyn UserStore>,
        audit_repo: Arc<dyn AuditStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        policy: Arc<dyn UserPolicy>,
    ) -> Self {
        Self {
            user_repo,
            audit_repo,
            hasher,
            validator,
            policy,
        }
    }

    /// Lists all users with pagination, each carrying its role list.
    ///
    /// Access to the list screen is itself recorded in the audit log.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<UserWithRoles>, AppError> {
        self.audit_repo
            .append(&CreateAuditEntry {
                actor_id: ctx.user_id,
                category: AUDIT_CATEGORY.to_string(),
                description: "Access list of users".to_string(),
                replay_action: None,
                data: None,
            })
            .await?;

        let users = self.user_repo.find_all(&page).await?;

        let ids: Vec<Uuid> = users.items.iter().map(|u| u.id).collect();
        let mut roles_by_user: std::collections::HashMap<Uuid, Vec<Role>> =
            std::collections::HashMap::new();
        for (user_id, role) in self.user_repo.roles_for_users(&ids).await? {
            roles_by_user.entry(user_id).or_default().push(role);
        }

        let items = users
            .items
            .into_iter()
            .map(|user| {
                let roles = roles_by_user.remove(&user.id).unwrap_or_default();
                UserWithRoles { user, roles }
            })
            .collect();

        Ok(PageResponse {
            items,
            page: users.page,
            page_size: users.page_size,
            total_items: users.total_items,
            total_pages: users.total_pages,
            has_next: users.has_next,
            has_previous: users.has_previous,
        })
    }

    /// Gets a single user by ID.
    pub async fn get_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Gets a user together with its role and permission membership.
    pub async fn get_user_detail(&self, user_id: Uuid) -> Result<UserDetail, AppError> {
        let user = self.get_user(user_id).await?;
        let roles = self.user_repo.roles_of(user_id).await?;
        let permissions = self.user_repo.permissions_of(user_id).await?;
        Ok(UserDetail {
            user,
            roles,
            permissions,
        })
    }

    /// Searches users by first name, last name, or username.
    pub async fn search(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        self.user_repo.search(query, &page).await
    }

    /// Creates a new user, then applies its role/permission membership.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        req: CreateUserRequest,
    ) -> Result<User, AppError> {
        if req.username.trim().is_empty() || req.username.len() < 3 {
            return Err(AppError::validation(
                "Username must be at least 3 characters",
            ));
        }

        if self
            .user_repo
            .find_by_username(&req.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Username is already taken"));
        }

        if self.user_repo.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::conflict("Email is already in use"));
        }

        self.validator.validate(&req.password)?;
        let password_hash = self.hasher.hash_password(&req.password)?;

        let user = self
            .user_repo
            .create(&CreateUser {
                first_name: req.first_name,
                last_name: req.last_name,
                username: req.username,
                email: req.email,
                password_hash,
                enabled: req.enabled,
            })
            .await?;

        if let Some(ref raw) = req.selected_roles {
            let role_ids = parse_selected_roles(raw)
                .map_err(|e| AppError::validation(e.message))?;
            self.user_repo.sync_roles(user.id, &role_ids).await?;
        }
        if let Some(ref perms) = req.perms {
            self.user_repo.sync_permissions(user.id, perms).await?;
        }

        info!(
            admin_id = %ctx.user_id,
            new_user_id = %user.id,
            username = %user.username,
            "User created by admin"
        );

        Ok(user)
    }

    /// Updates a user's profile, membership, and optionally its password.
    ///
    /// The submitted attribute set is recorded in the audit log *before*
    /// any mutation, with credential fields blanked, so the edit can be
    /// replayed later. Attempts blocked by the editability policy are
    /// therefore still visible in the audit trail.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        req: UpdateUserRequest,
    ) -> Result<User, AppError> {
        let mut user = self.get_user(user_id).await?;

        self.audit_repo
            .append(&CreateAuditEntry {
                actor_id: ctx.user_id,
                category: AUDIT_CATEGORY.to_string(),
                description: format!("Edits user: {}", user.username),
                replay_action: Some(REPLAY_EDIT_ACTION.to_string()),
                data: Some(replay_snapshot_data(user_id, &req)),
            })
            .await?;

        if !self.policy.is_editable(&user) {
            return Err(AppError::forbidden("User is not editable"));
        }

        if !req.username.eq_ignore_ascii_case(&user.username)
            && self
                .user_repo
                .find_by_username(&req.username)
                .await?
                .is_some()
        {
            return Err(AppError::conflict("Username is already taken"));
        }

        if !req.email.eq_ignore_ascii_case(&user.email)
            && self.user_repo.find_by_email(&req.email).await?.is_some()
        {
            return Err(AppError::conflict("Email is already in use"));
        }

        if let Some(ref password) = req.password {
            if !password.is_empty() {
                self.validator.validate(password)?;
                let hash = self.hasher.hash_password(password)?;
                self.user_repo.update_password(user_id, &hash).await?;
            }
        }

        user.first_name = req.first_name;
        user.last_name = req.last_name;
        user.username = req.username;
        user.email = req.email;
        user.enabled = req.enabled;

        if let Some(ref raw) = req.selected_roles {
            let role_ids = parse_selected_roles(raw)
                .map_err(|e| AppError::validation(e.message))?;
            self.user_repo.sync_roles(user_id, &role_ids).await?;
        }
        if let Some(ref perms) = req.perms {
            self.user_repo.sync_permissions(user_id, perms).await?;
        }

        let user = self.user_repo.update_profile(&user).await?;

        info!(admin_id = %ctx.user_id, target_id = %user_id, "User updated by admin");

        Ok(user)
    }

    /// Enables a user account.
    pub async fn enable_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<User, AppError> {
        let user = self.user_repo.set_enabled(user_id, true).await?;
        info!(admin_id = %ctx.user_id, target_id = %user_id, "User enabled");
        Ok(user)
    }

    /// Disables a user account, if policy allows it.
    pub async fn disable_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
    ) -> Result<User, AppError> {
        let user = self.get_user(user_id).await?;

        if !self.policy.can_be_disabled(&user) {
            return Err(AppError::forbidden("User cannot be disabled"));
        }

        let user = self.user_repo.set_enabled(user_id, false).await?;
        info!(admin_id = %ctx.user_id, target_id = %user_id, "User disabled");
        Ok(user)
    }

    /// Enables a batch of users. Returns how many were enabled.
    pub async fn enable_many(
        &self,
        ctx: &RequestContext,
        user_ids: &[Uuid],
    ) -> Result<u64, AppError> {
        let mut enabled = 0;
        for &user_id in user_ids {
            self.user_repo.set_enabled(user_id, true).await?;
            enabled += 1;
        }
        info!(admin_id = %ctx.user_id, count = enabled, "Users enabled in bulk");
        Ok(enabled)
    }

    /// Disables a batch of users, skipping those policy shields.
    /// Returns how many were disabled.
    pub async fn disable_many(
        &self,
        ctx: &RequestContext,
        user_ids: &[Uuid],
    ) -> Result<u64, AppError> {
        let mut disabled = 0;
        for &user_id in user_ids {
            let user = self.get_user(user_id).await?;
            if !self.policy.can_be_disabled(&user) {
                warn!(target_id = %user_id, "Skipping user that cannot be disabled");
                continue;
            }
            self.user_repo.set_enabled(user_id, false).await?;
            disabled += 1;
        }
        info!(admin_id = %ctx.user_id, count = disabled, "Users disabled in bulk");
        Ok(disabled)
    }

    /// Deletes a user, if policy allows it. Admins cannot delete
    /// themselves.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<(), AppError> {
        if user_id == ctx.user_id {
            return Err(AppError::forbidden("Cannot delete your own account"));
        }

        let user = self.get_user(user_id).await?;

        if !self.policy.is_deletable(&user) {
            return Err(AppError::forbidden("User is not deletable"));
        }

        self.user_repo.delete(user_id).await?;

        info!(
            admin_id = %ctx.user_id,
            target_id = %user_id,
            username = %user.username,
            "User deleted"
        );

        Ok(())
    }
}

/// Builds the replayable attribute snapshot recorded alongside an edit.
///
/// Password fields are blanked: they are not replay-able.
fn replay_snapshot_data(user_id: Uuid, req: &UpdateUserRequest) -> serde_json::Value {
    let mut data = serde_json::json!({
        "id": user_id.to_string(),
        "first_name": req.first_name,
        "last_name": req.last_name,
        "username": req.username,
        "email": req.email,
        "enabled": req.enabled,
        "password": "",
        "password_confirmation": "",
    });
    if let Some(ref raw) = req.selected_roles {
        data["selected_roles"] = serde_json::Value::String(raw.clone());
    }
    if let Some(ref perms) = req.perms {
        data["perms"] = serde_json::json!(
            perms.iter().map(Uuid::to_string).collect::<Vec<_>>()
        );
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_entity::audit::ReplaySnapshot;

    fn update_request() -> UpdateUserRequest {
        UpdateUserRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            username: "jdoe".to_string(),
            email: "j@x.com".to_string(),
            enabled: true,
            password: Some("S3cret-Enough!".to_string()),
            selected_roles: Some(format!("{}", Uuid::new_v4())),
            perms: None,
        }
    }

    #[test]
    fn test_snapshot_blanks_credentials() {
        let data = replay_snapshot_data(Uuid::new_v4(), &update_request());
        assert_eq!(data["password"], "");
        assert_eq!(data["password_confirmation"], "");
        assert!(data.get("perms").is_none());
    }

    #[test]
    fn test_snapshot_round_trips_through_decode() {
        let user_id = Uuid::new_v4();
        let data = replay_snapshot_data(user_id, &update_request());
        let snap = ReplaySnapshot::decode(&data).unwrap();
        assert_eq!(snap.user_id, user_id);
        assert_eq!(snap.first_name, "Jane");
        assert!(snap.enabled);
        assert_eq!(snap.selected_roles.map(|r| r.len()), Some(1));
        assert!(snap.perms.is_none());
    }
}
