//! Request context carrying the authenticated actor.
//!
//! The actor is threaded explicitly into every service method instead of
//! being read from ambient global state, so each operation knows *who* is
//! acting without reaching outside its arguments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for the current authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The username (convenience field from token claims).
    pub username: String,
    /// Whether the token marks the caller as an administrator.
    pub is_admin: bool,
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: Uuid,
        username: String,
        is_admin: bool,
        ip_address: String,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            user_id,
            username,
            is_admin,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }
}
