//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable audit log entry recording an administrative action.
///
/// Entries are append-only: nothing in Roster edits or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// The user who performed the action.
    pub actor_id: Uuid,
    /// Action category (e.g. `"Admin users"`).
    pub category: String,
    /// Human-readable description of the action.
    pub description: String,
    /// Route identifier of the action that can re-apply this entry
    /// (e.g. `"admin.users.replay-edit"`), if the entry is replayable.
    pub replay_action: Option<String>,
    /// Snapshot of the attributes submitted in the original mutating
    /// operation, sufficient to redo it. Credential fields are blanked
    /// before the snapshot is written.
    pub data: Option<serde_json::Value>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditEntry {
    /// The user who performed the action.
    pub actor_id: Uuid,
    /// Action category.
    pub category: String,
    /// Human-readable description.
    pub description: String,
    /// Replayable action identifier, if any.
    pub replay_action: Option<String>,
    /// Attribute snapshot, if the action is replayable.
    pub data: Option<serde_json::Value>,
}
