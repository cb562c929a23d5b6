//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create user request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserBody {
    /// Given name.
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    /// Username.
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Initial password.
    #[validate(length(min = 8))]
    pub password: String,
    /// Initial enabled state (defaults to enabled).
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Comma-separated role ids.
    pub selected_roles: Option<String>,
    /// Direct permission grants.
    pub perms: Option<Vec<Uuid>>,
}

/// Update user request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserBody {
    /// Given name.
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    /// Username.
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Enabled state.
    pub enabled: bool,
    /// New password; omit or send empty to keep the current one.
    pub password: Option<String>,
    /// Comma-separated role ids; omit to leave roles untouched.
    pub selected_roles: Option<String>,
    /// Permission grants; omit to leave permissions untouched.
    pub perms: Option<Vec<Uuid>>,
}

/// Bulk enable/disable request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkUserIds {
    /// Target user ids.
    #[validate(length(min = 1, message = "At least one user id is required"))]
    pub ids: Vec<Uuid>,
}

/// Search query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Free-text query matched against first name, last name, username.
    pub query: String,
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_rejects_bad_email() {
        let body = CreateUserBody {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            username: "abc".to_string(),
            email: "not-an-email".to_string(),
            password: "Long-Enough-1".to_string(),
            enabled: true,
            selected_roles: None,
            perms: None,
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_create_body_defaults_to_enabled() {
        let body: CreateUserBody = serde_json::from_value(serde_json::json!({
            "first_name": "A",
            "last_name": "B",
            "username": "abc",
            "email": "a@b.com",
            "password": "Long-Enough-1",
        }))
        .unwrap();
        assert!(body.enabled);
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_bulk_ids_requires_at_least_one() {
        let body = BulkUserIds { ids: vec![] };
        assert!(body.validate().is_err());
    }
}
