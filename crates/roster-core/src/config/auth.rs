//! Authentication and account-policy configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
///
/// Tokens are minted by the external identity provider; Roster only
/// validates them with the shared secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT validation (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Minimum password length for newly stored credentials.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Usernames that may never be edited, disabled, or deleted through
    /// the admin surface.
    #[serde(default = "default_protected_usernames")]
    pub protected_usernames: Vec<String>,
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_password_min() -> usize {
    8
}

fn default_protected_usernames() -> Vec<String> {
    vec!["root".to_string()]
}
