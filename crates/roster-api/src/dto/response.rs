//! Response DTOs.

use serde::Serialize;

use roster_entity::permission::Permission;
use roster_entity::role::Role;
use roster_entity::user::User;

/// Result of a bulk enable/disable operation.
#[derive(Debug, Clone, Serialize)]
pub struct BulkActionResponse {
    /// Number of users affected.
    pub affected: u64,
}

/// Response to a replayed edit: the user as persisted, plus the full
/// role and permission catalogs for re-display of the edit screen.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayResponse {
    /// The user after the replay was applied.
    pub user: User,
    /// Role catalog, names ascending.
    pub roles: Vec<Role>,
    /// Permission catalog, names ascending.
    pub permissions: Vec<Permission>,
}
