//! Replaying audited user edits.
//!
//! An audited edit stores the full attribute set the admin submitted.
//! Replaying re-applies that snapshot to the user it targeted: profile
//! scalars are overwritten, and role/permission membership is replaced
//! wholesale when the snapshot carries it. Credentials are never part
//! of a snapshot and are left untouched.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use roster_core::error::AppError;
use roster_database::repositories::store::{AuditStore, UserStore};
use roster_entity::audit::ReplaySnapshot;
use roster_entity::user::User;

use crate::context::RequestContext;
use crate::policy::UserPolicy;

/// Re-applies audited edits to their target users.
#[derive(Clone)]
pub struct ReplayService {
    /// Audit log store.
    audit_repo: Arc<dyn AuditStore>,
    /// User store.
    user_repo: Arc<dyn UserStore>,
    /// Mutation policy.
    policy: Arc<dyn UserPolicy>,
}

impl ReplayService {
    /// Creates a new replay service.
    pub fn new(
        audit_repo: Arc<dyn AuditStore>,
        user_repo: Arc<dyn UserStore>,
        policy: Arc<dyn UserPolicy>,
    ) -> Self {
        Self {
            audit_repo,
            user_repo,
            policy,
        }
    }

    /// Replays the edit recorded in the given audit entry.
    ///
    /// All lookups, payload decoding, and the editability check happen
    /// before anything is written, so a failed replay leaves the user
    /// untouched. Returns the user as persisted after the replay.
    pub async fn replay(&self, ctx: &RequestContext, audit_id: Uuid) -> Result<User, AppError> {
        let entry = self
            .audit_repo
            .find_by_id(audit_id)
            .await?
            .ok_or_else(|| AppError::not_found("Audit entry not found"))?;

        let data = entry
            .data
            .as_ref()
            .ok_or_else(|| AppError::malformed_payload("Audit entry has no replay payload"))?;

        let snapshot = ReplaySnapshot::decode(data)?;

        let mut user = self
            .user_repo
            .find_by_id(snapshot.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User targeted by audit entry not found"))?;

        if !self.policy.is_editable(&user) {
            return Err(AppError::forbidden("User is not editable"));
        }

        snapshot.apply_profile(&mut user);

        if let Some(ref role_ids) = snapshot.selected_roles {
            self.user_repo.sync_roles(user.id, role_ids).await?;
        }
        if let Some(ref permission_ids) = snapshot.perms {
            self.user_repo
                .sync_permissions(user.id, permission_ids)
                .await?;
        }

        let user = self.user_repo.update_profile(&user).await?;

        info!(
            admin_id = %ctx.user_id,
            audit_id = %audit_id,
            target_id = %user.id,
            "Audited edit replayed"
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::{Value, json};

    use roster_core::error::ErrorKind;
    use roster_core::result::AppResult;
    use roster_core::types::pagination::{PageRequest, PageResponse};
    use roster_entity::audit::{AuditEntry, CreateAuditEntry};
    use roster_entity::permission::Permission;
    use roster_entity::role::Role;
    use roster_entity::user::CreateUser;

    use crate::policy::ProtectedUserPolicy;

    struct FakeAuditStore {
        entries: HashMap<Uuid, AuditEntry>,
    }

    impl FakeAuditStore {
        fn with_entry(entry: AuditEntry) -> Self {
            Self {
                entries: HashMap::from([(entry.id, entry)]),
            }
        }

        fn empty() -> Self {
            Self {
                entries: HashMap::new(),
            }
        }
    }

    #[async_trait]
    impl AuditStore for FakeAuditStore {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditEntry>> {
            Ok(self.entries.get(&id).cloned())
        }

        async fn append(&self, _data: &CreateAuditEntry) -> AppResult<AuditEntry> {
            unimplemented!()
        }

        async fn find_all(&self, _page: &PageRequest) -> AppResult<PageResponse<AuditEntry>> {
            unimplemented!()
        }
    }

    /// In-memory user store that counts every write it receives.
    #[derive(Default)]
    struct FakeUserStore {
        users: Mutex<HashMap<Uuid, User>>,
        profile_writes: Mutex<u32>,
        role_syncs: Mutex<Vec<(Uuid, Vec<Uuid>)>>,
        permission_syncs: Mutex<Vec<(Uuid, Vec<Uuid>)>>,
    }

    impl FakeUserStore {
        fn with_user(user: User) -> Self {
            let store = Self::default();
            store.users.lock().unwrap().insert(user.id, user);
            store
        }

        fn write_count(&self) -> usize {
            *self.profile_writes.lock().unwrap() as usize
                + self.role_syncs.lock().unwrap().len()
                + self.permission_syncs.lock().unwrap().len()
        }

        fn stored(&self, id: Uuid) -> User {
            self.users.lock().unwrap().get(&id).cloned().unwrap()
        }
    }

    #[async_trait]
    impl UserStore for FakeUserStore {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
            Ok(self.users.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_username(&self, _username: &str) -> AppResult<Option<User>> {
            unimplemented!()
        }

        async fn find_by_email(&self, _email: &str) -> AppResult<Option<User>> {
            unimplemented!()
        }

        async fn find_all(&self, _page: &PageRequest) -> AppResult<PageResponse<User>> {
            unimplemented!()
        }

        async fn search(
            &self,
            _query: &str,
            _page: &PageRequest,
        ) -> AppResult<PageResponse<User>> {
            unimplemented!()
        }

        async fn create(&self, _data: &CreateUser) -> AppResult<User> {
            unimplemented!()
        }

        async fn update_profile(&self, user: &User) -> AppResult<User> {
            *self.profile_writes.lock().unwrap() += 1;
            self.users.lock().unwrap().insert(user.id, user.clone());
            Ok(user.clone())
        }

        async fn update_password(&self, _user_id: Uuid, _hash: &str) -> AppResult<()> {
            unimplemented!()
        }

        async fn set_enabled(&self, _user_id: Uuid, _enabled: bool) -> AppResult<User> {
            unimplemented!()
        }

        async fn delete(&self, _user_id: Uuid) -> AppResult<bool> {
            unimplemented!()
        }

        async fn roles_of(&self, _user_id: Uuid) -> AppResult<Vec<Role>> {
            unimplemented!()
        }

        async fn permissions_of(&self, _user_id: Uuid) -> AppResult<Vec<Permission>> {
            unimplemented!()
        }

        async fn roles_for_users(&self, _user_ids: &[Uuid]) -> AppResult<Vec<(Uuid, Role)>> {
            unimplemented!()
        }

        async fn sync_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> AppResult<()> {
            self.role_syncs
                .lock()
                .unwrap()
                .push((user_id, role_ids.to_vec()));
            Ok(())
        }

        async fn sync_permissions(&self, user_id: Uuid, perm_ids: &[Uuid]) -> AppResult<()> {
            self.permission_syncs
                .lock()
                .unwrap()
                .push((user_id, perm_ids.to_vec()));
            Ok(())
        }
    }

    fn sample_user(id: Uuid, username: &str) -> User {
        User {
            id,
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            username: username.to_string(),
            email: "old@example.com".to_string(),
            password_hash: "$argon2id$original".to_string(),
            enabled: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn audit_entry(id: Uuid, data: Option<Value>) -> AuditEntry {
        AuditEntry {
            id,
            actor_id: Uuid::new_v4(),
            category: "Admin users".to_string(),
            description: "Edits user: jdoe".to_string(),
            replay_action: Some("admin.users.replay-edit".to_string()),
            data,
            created_at: Utc::now(),
        }
    }

    fn payload_for(user_id: Uuid) -> Value {
        json!({
            "id": user_id.to_string(),
            "first_name": "Jane",
            "last_name": "Doe",
            "username": "jdoe",
            "email": "new@example.com",
            "enabled": true,
            "password": "",
            "password_confirmation": "",
        })
    }

    fn ctx() -> RequestContext {
        RequestContext::new(
            Uuid::new_v4(),
            "admin".to_string(),
            true,
            "127.0.0.1".to_string(),
            None,
        )
    }

    fn service(audit: FakeAuditStore, users: Arc<FakeUserStore>) -> ReplayService {
        ReplayService::new(
            Arc::new(audit),
            users,
            Arc::new(ProtectedUserPolicy::new(vec!["root".to_string()])),
        )
    }

    #[tokio::test]
    async fn test_missing_audit_entry_is_not_found_without_writes() {
        let users = Arc::new(FakeUserStore::default());
        let svc = service(FakeAuditStore::empty(), Arc::clone(&users));

        let err = svc.replay(&ctx(), Uuid::new_v4()).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(users.write_count(), 0);
    }

    #[tokio::test]
    async fn test_entry_without_payload_writes_nothing() {
        let audit_id = Uuid::new_v4();
        let user = sample_user(Uuid::new_v4(), "jdoe");
        let users = Arc::new(FakeUserStore::with_user(user));
        let svc = service(
            FakeAuditStore::with_entry(audit_entry(audit_id, None)),
            Arc::clone(&users),
        );

        let err = svc.replay(&ctx(), audit_id).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Serialization);
        assert_eq!(users.write_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_payload_writes_nothing() {
        let audit_id = Uuid::new_v4();
        let user = sample_user(Uuid::new_v4(), "jdoe");
        let users = Arc::new(FakeUserStore::with_user(user));
        // Payload lacks the profile fields entirely.
        let svc = service(
            FakeAuditStore::with_entry(audit_entry(audit_id, Some(json!({ "id": "nope" })))),
            Arc::clone(&users),
        );

        let err = svc.replay(&ctx(), audit_id).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Serialization);
        assert_eq!(users.write_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_target_user_is_not_found_without_writes() {
        let audit_id = Uuid::new_v4();
        let users = Arc::new(FakeUserStore::default());
        let svc = service(
            FakeAuditStore::with_entry(audit_entry(audit_id, Some(payload_for(Uuid::new_v4())))),
            Arc::clone(&users),
        );

        let err = svc.replay(&ctx(), audit_id).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(users.write_count(), 0);
    }

    #[tokio::test]
    async fn test_protected_user_is_forbidden_without_writes() {
        let audit_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let users = Arc::new(FakeUserStore::with_user(sample_user(user_id, "root")));
        let svc = service(
            FakeAuditStore::with_entry(audit_entry(audit_id, Some(payload_for(user_id)))),
            Arc::clone(&users),
        );

        let err = svc.replay(&ctx(), audit_id).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(users.write_count(), 0);
    }

    #[tokio::test]
    async fn test_replay_applies_profile_and_keeps_credentials() {
        let audit_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let users = Arc::new(FakeUserStore::with_user(sample_user(user_id, "jsmith")));
        let svc = service(
            FakeAuditStore::with_entry(audit_entry(audit_id, Some(payload_for(user_id)))),
            Arc::clone(&users),
        );

        let replayed = svc.replay(&ctx(), audit_id).await.unwrap();

        assert_eq!(replayed.username, "jdoe");
        assert_eq!(replayed.email, "new@example.com");
        assert!(replayed.enabled);
        assert_eq!(users.stored(user_id).password_hash, "$argon2id$original");
        // No membership keys in the payload, so neither relation is touched.
        assert!(users.role_syncs.lock().unwrap().is_empty());
        assert!(users.permission_syncs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replay_syncs_roles_when_payload_carries_them() {
        let audit_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let role_a = Uuid::new_v4();
        let role_b = Uuid::new_v4();

        let mut payload = payload_for(user_id);
        payload["selected_roles"] = json!(format!("{role_a},{role_b}"));

        let users = Arc::new(FakeUserStore::with_user(sample_user(user_id, "jsmith")));
        let svc = service(
            FakeAuditStore::with_entry(audit_entry(audit_id, Some(payload))),
            Arc::clone(&users),
        );

        svc.replay(&ctx(), audit_id).await.unwrap();

        let syncs = users.role_syncs.lock().unwrap();
        assert_eq!(syncs.as_slice(), &[(user_id, vec![role_a, role_b])]);
    }
}
