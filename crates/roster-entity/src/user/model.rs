//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::role::Role;

/// A managed user account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier. Immutable after creation.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Argon2 password hash. Never serialized, never touched by replay.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Whether the account may log in. Toggled only by the explicit
    /// enable/disable operations or by a replayed edit that carries it.
    pub enabled: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The user's full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Initial enabled state.
    pub enabled: bool,
}

/// A user together with its role memberships, as shown on the list screen.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithRoles {
    /// The user record.
    #[serde(flatten)]
    pub user: User,
    /// Roles the user belongs to.
    pub roles: Vec<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            username: "jdoe".to_string(),
            email: "j@x.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(sample_user().full_name(), "Jane Doe");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "jdoe");
    }
}
