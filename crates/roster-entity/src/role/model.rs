//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A role users can be members of.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Machine-readable role name (e.g. `"admins"`).
    pub name: String,
    /// Human-readable role name.
    pub display_name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}
