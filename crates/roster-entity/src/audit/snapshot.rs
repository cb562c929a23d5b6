//! Replay snapshot — the structured form of an audit entry's `data` field.
//!
//! An audited edit records the attribute set that was submitted, keyed the
//! way the edit form submits it: the five profile scalars, the target
//! user's `id`, an optional `selected_roles` comma-separated id list, and
//! an optional `perms` id array. Replaying decodes that payload once, up
//! front, into a [`ReplaySnapshot`]; a payload that is not an object or is
//! missing a required key is rejected before anything is mutated.

use serde_json::Value;
use uuid::Uuid;

use roster_core::{AppError, AppResult};

use crate::user::User;

/// Decoded, validated replay payload extracted from `AuditEntry::data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySnapshot {
    /// The user the recorded edit targeted.
    pub user_id: Uuid,
    /// Recorded given name.
    pub first_name: String,
    /// Recorded family name.
    pub last_name: String,
    /// Recorded username.
    pub username: String,
    /// Recorded email address.
    pub email: String,
    /// Recorded enabled state.
    pub enabled: bool,
    /// Role ids to full-replace sync, if the recorded edit touched roles.
    /// `None` means "leave role membership untouched".
    pub selected_roles: Option<Vec<Uuid>>,
    /// Permission ids to full-replace sync, if the recorded edit touched
    /// permissions. `None` means "leave permission membership untouched".
    pub perms: Option<Vec<Uuid>>,
}

impl ReplaySnapshot {
    /// Decode an audit entry's `data` payload.
    ///
    /// Unknown keys are ignored; recorded payloads legitimately carry
    /// blanked `password` placeholders that replay must never apply.
    pub fn decode(data: &Value) -> AppResult<Self> {
        let obj = data
            .as_object()
            .ok_or_else(|| AppError::malformed_payload("Replay payload is not an object"))?;

        let user_id = obj
            .get("id")
            .ok_or_else(|| AppError::malformed_payload("Replay payload is missing 'id'"))?;
        let user_id = parse_uuid(user_id)
            .ok_or_else(|| AppError::malformed_payload("Replay payload has a malformed 'id'"))?;

        let selected_roles = match obj.get("selected_roles") {
            None => None,
            Some(v) => {
                let raw = v.as_str().ok_or_else(|| {
                    AppError::malformed_payload("'selected_roles' must be a string")
                })?;
                Some(parse_selected_roles(raw)?)
            }
        };

        let perms = match obj.get("perms") {
            None => None,
            Some(v) => {
                let items = v
                    .as_array()
                    .ok_or_else(|| AppError::malformed_payload("'perms' must be an array"))?;
                let mut ids = Vec::with_capacity(items.len());
                for item in items {
                    ids.push(parse_uuid(item).ok_or_else(|| {
                        AppError::malformed_payload("'perms' contains a malformed id")
                    })?);
                }
                Some(ids)
            }
        };

        Ok(Self {
            user_id,
            first_name: require_string(obj, "first_name")?,
            last_name: require_string(obj, "last_name")?,
            username: require_string(obj, "username")?,
            email: require_string(obj, "email")?,
            enabled: require_enabled(obj)?,
            selected_roles,
            perms,
        })
    }

    /// Overwrite the five replayable profile scalars on `user`.
    ///
    /// The credential hash is deliberately left alone: replaying a
    /// historical edit must never resurrect a password value.
    pub fn apply_profile(&self, user: &mut User) {
        user.first_name = self.first_name.clone();
        user.last_name = self.last_name.clone();
        user.username = self.username.clone();
        user.email = self.email.clone();
        user.enabled = self.enabled;
    }
}

/// Parse a comma-separated role id list, as submitted by the edit form
/// and as recorded in replay payloads.
///
/// An empty string means "sync to no roles" (remove all memberships).
pub fn parse_selected_roles(raw: &str) -> AppResult<Vec<Uuid>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|part| {
            Uuid::parse_str(part.trim()).map_err(|_| {
                AppError::malformed_payload(format!("'selected_roles' contains a malformed id: '{part}'"))
            })
        })
        .collect()
}

fn parse_uuid(value: &Value) -> Option<Uuid> {
    value.as_str().and_then(|s| Uuid::parse_str(s).ok())
}

fn require_string(
    obj: &serde_json::Map<String, Value>,
    key: &str,
) -> AppResult<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::malformed_payload(format!("Replay payload is missing '{key}'")))
}

/// The edit form posts `enabled` as a boolean, but historical entries may
/// carry the checkbox value as a string or 0/1.
fn require_enabled(obj: &serde_json::Map<String, Value>) -> AppResult<bool> {
    let value = obj
        .get("enabled")
        .ok_or_else(|| AppError::malformed_payload("Replay payload is missing 'enabled'"))?;
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) if n.as_i64() == Some(0) => Ok(false),
        Value::Number(n) if n.as_i64() == Some(1) => Ok(true),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(AppError::malformed_payload(
                "'enabled' is not a recognizable boolean",
            )),
        },
        _ => Err(AppError::malformed_payload(
            "'enabled' is not a recognizable boolean",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use roster_core::error::ErrorKind;
    use serde_json::json;

    fn target_id() -> Uuid {
        Uuid::parse_str("5f2f1a20-8df4-4a2e-9d32-0f6d0a35b001").unwrap()
    }

    fn role_a() -> Uuid {
        Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap()
    }

    fn role_b() -> Uuid {
        Uuid::parse_str("22222222-2222-2222-2222-222222222222").unwrap()
    }

    fn base_payload() -> Value {
        json!({
            "id": target_id().to_string(),
            "first_name": "Jane",
            "last_name": "Doe",
            "username": "jdoe",
            "email": "j@x.com",
            "enabled": true,
        })
    }

    fn sample_user() -> User {
        User {
            id: target_id(),
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            username: "jsmith".to_string(),
            email: "old@x.com".to_string(),
            password_hash: "$argon2id$original".to_string(),
            enabled: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_decode_minimal_payload() {
        let snap = ReplaySnapshot::decode(&base_payload()).unwrap();
        assert_eq!(snap.user_id, target_id());
        assert_eq!(snap.first_name, "Jane");
        assert!(snap.enabled);
        assert!(snap.selected_roles.is_none());
        assert!(snap.perms.is_none());
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = ReplaySnapshot::decode(&json!("not an object")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[test]
    fn test_decode_rejects_missing_id() {
        let mut payload = base_payload();
        payload.as_object_mut().unwrap().remove("id");
        let err = ReplaySnapshot::decode(&payload).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
        assert!(err.message.contains("'id'"));
    }

    #[test]
    fn test_decode_rejects_missing_scalar() {
        let mut payload = base_payload();
        payload.as_object_mut().unwrap().remove("email");
        assert!(ReplaySnapshot::decode(&payload).is_err());
    }

    #[test]
    fn test_decode_splits_selected_roles() {
        let mut payload = base_payload();
        payload["selected_roles"] = json!(format!("{},{}", role_a(), role_b()));
        let snap = ReplaySnapshot::decode(&payload).unwrap();
        assert_eq!(snap.selected_roles, Some(vec![role_a(), role_b()]));
    }

    #[test]
    fn test_decode_empty_selected_roles_means_remove_all() {
        let mut payload = base_payload();
        payload["selected_roles"] = json!("");
        let snap = ReplaySnapshot::decode(&payload).unwrap();
        assert_eq!(snap.selected_roles, Some(Vec::new()));
    }

    #[test]
    fn test_decode_rejects_malformed_role_id() {
        let mut payload = base_payload();
        payload["selected_roles"] = json!("not-a-uuid");
        assert!(ReplaySnapshot::decode(&payload).is_err());
    }

    #[test]
    fn test_decode_perms_array() {
        let mut payload = base_payload();
        payload["perms"] = json!([role_a().to_string()]);
        let snap = ReplaySnapshot::decode(&payload).unwrap();
        assert_eq!(snap.perms, Some(vec![role_a()]));
    }

    #[test]
    fn test_decode_ignores_blanked_password_keys() {
        let mut payload = base_payload();
        payload["password"] = json!("");
        payload["password_confirmation"] = json!("");
        assert!(ReplaySnapshot::decode(&payload).is_ok());
    }

    #[test]
    fn test_decode_enabled_string_forms() {
        for (raw, expected) in [
            (json!("1"), true),
            (json!("0"), false),
            (json!(1), true),
            (json!(false), false),
        ] {
            let mut payload = base_payload();
            payload["enabled"] = raw;
            let snap = ReplaySnapshot::decode(&payload).unwrap();
            assert_eq!(snap.enabled, expected);
        }
    }

    #[test]
    fn test_apply_profile_overwrites_five_scalars_only() {
        let snap = ReplaySnapshot::decode(&base_payload()).unwrap();
        let mut user = sample_user();
        let hash_before = user.password_hash.clone();
        let id_before = user.id;

        snap.apply_profile(&mut user);

        assert_eq!(user.first_name, "Jane");
        assert_eq!(user.last_name, "Doe");
        assert_eq!(user.username, "jdoe");
        assert_eq!(user.email, "j@x.com");
        assert!(user.enabled);
        // The credential hash and identity must be bit-identical.
        assert_eq!(user.password_hash, hash_before);
        assert_eq!(user.id, id_before);
    }

    #[test]
    fn test_apply_profile_ignores_password_in_payload() {
        let mut payload = base_payload();
        payload["password"] = json!("hunter2");
        let snap = ReplaySnapshot::decode(&payload).unwrap();
        let mut user = sample_user();
        let hash_before = user.password_hash.clone();
        snap.apply_profile(&mut user);
        assert_eq!(user.password_hash, hash_before);
    }
}
