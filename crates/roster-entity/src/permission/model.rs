//! Permission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A permission that can be granted to users directly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// Machine-readable permission name (e.g. `"users.manage"`).
    pub name: String,
    /// Human-readable permission name.
    pub display_name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// When the permission was created.
    pub created_at: DateTime<Utc>,
}
