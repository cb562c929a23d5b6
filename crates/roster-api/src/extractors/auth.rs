//! `AuthUser` extractor — pulls the bearer token from the Authorization
//! header, validates it, and injects the request context.
//!
//! Tokens are minted by the external identity provider; Roster only
//! verifies the HS256 signature and reads the claims.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roster_core::error::AppError;
use roster_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Claims Roster reads from an externally minted access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user's id.
    pub sub: Uuid,
    /// Username, for log context.
    pub username: String,
    /// Whether the caller is an administrator.
    #[serde(default)]
    pub admin: bool,
    /// Expiry (seconds since epoch); enforced by the decoder.
    pub exp: usize,
}

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

        let claims = decode_claims(token, &state.config.auth.jwt_secret)?;

        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let ctx = RequestContext::new(
            claims.sub,
            claims.username,
            claims.admin,
            ip_address,
            user_agent,
        );

        Ok(AuthUser(ctx))
    }
}

/// Decodes and validates an HS256 access token.
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::unauthorized(format!("Invalid token: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn mint(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            username: "admin".to_string(),
            admin: true,
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        }
    }

    #[test]
    fn test_round_trip_decode() {
        let claims = valid_claims();
        let token = mint(&claims, "secret");
        let decoded = decode_claims(&token, "secret").unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert!(decoded.admin);
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let token = mint(&valid_claims(), "secret");
        assert!(decode_claims(&token, "other").is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let mut claims = valid_claims();
        claims.exp = 1_000_000; // long past
        let token = mint(&claims, "secret");
        assert!(decode_claims(&token, "secret").is_err());
    }
}
