//! Admin guard for the /api/admin routes.

use roster_core::error::AppError;

use crate::extractors::AuthUser;

/// Rejects callers whose token does not mark them as an administrator.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if auth.is_admin {
        Ok(())
    } else {
        Err(AppError::forbidden("Administrator access required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::error::ErrorKind;
    use roster_service::context::RequestContext;
    use uuid::Uuid;

    fn auth(is_admin: bool) -> AuthUser {
        AuthUser(RequestContext::new(
            Uuid::new_v4(),
            "someone".to_string(),
            is_admin,
            "127.0.0.1".to_string(),
            None,
        ))
    }

    #[test]
    fn test_admin_passes() {
        assert!(require_admin(&auth(true)).is_ok());
    }

    #[test]
    fn test_non_admin_is_forbidden() {
        let err = require_admin(&auth(false)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }
}
