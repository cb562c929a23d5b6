//! Mutation policies for user records.
//!
//! Whether a given user may be edited, deleted, or disabled is domain
//! policy, not something the admin services compute themselves — they
//! consult an injected [`UserPolicy`].

use roster_entity::user::User;

/// Predicates gating mutation of a user record.
pub trait UserPolicy: Send + Sync {
    /// Whether the user's attributes may be edited (including by replay).
    fn is_editable(&self, user: &User) -> bool;

    /// Whether the user may be deleted.
    fn is_deletable(&self, user: &User) -> bool;

    /// Whether the user may be disabled.
    fn can_be_disabled(&self, user: &User) -> bool;
}

/// Policy that shields a configured set of usernames from mutation.
///
/// Protected accounts (typically `root`) cannot be edited, deleted, or
/// disabled through the admin surface.
#[derive(Debug, Clone)]
pub struct ProtectedUserPolicy {
    protected_usernames: Vec<String>,
}

impl ProtectedUserPolicy {
    /// Creates a policy from the configured protected username list.
    pub fn new(protected_usernames: Vec<String>) -> Self {
        Self {
            protected_usernames,
        }
    }

    fn is_protected(&self, user: &User) -> bool {
        self.protected_usernames
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&user.username))
    }
}

impl UserPolicy for ProtectedUserPolicy {
    fn is_editable(&self, user: &User) -> bool {
        !self.is_protected(user)
    }

    fn is_deletable(&self, user: &User) -> bool {
        !self.is_protected(user)
    }

    fn can_be_disabled(&self, user: &User) -> bool {
        !self.is_protected(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user_named(username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: String::new(),
            enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_protected_user_is_shielded() {
        let policy = ProtectedUserPolicy::new(vec!["root".to_string()]);
        let root = user_named("root");
        assert!(!policy.is_editable(&root));
        assert!(!policy.is_deletable(&root));
        assert!(!policy.can_be_disabled(&root));
    }

    #[test]
    fn test_protection_is_case_insensitive() {
        let policy = ProtectedUserPolicy::new(vec!["root".to_string()]);
        assert!(!policy.is_editable(&user_named("Root")));
    }

    #[test]
    fn test_ordinary_user_is_mutable() {
        let policy = ProtectedUserPolicy::new(vec!["root".to_string()]);
        let user = user_named("jdoe");
        assert!(policy.is_editable(&user));
        assert!(policy.is_deletable(&user));
        assert!(policy.can_be_disabled(&user));
    }
}
