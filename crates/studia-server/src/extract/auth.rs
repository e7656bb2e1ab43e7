//! Bearer-token authentication extractors.

use std::borrow::Cow;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use derive_more::Deref;
use jiff::Timestamp;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};

/// JWT issuer identifier.
const JWT_ISSUER: &str = "studia";

/// Default token lifetime in seconds (30 days).
const DEFAULT_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// JWT claims for authentication tokens.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthClaims {
    /// Issuer (who created the token).
    #[serde(rename = "iss")]
    issued_by: Cow<'static, str>,

    /// Subject: the authenticated account.
    #[serde(rename = "sub")]
    pub account_id: Uuid,

    /// Issued at, seconds since the Unix epoch.
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration time, seconds since the Unix epoch.
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl AuthClaims {
    /// Creates claims for an account with the given lifetime.
    fn new(account_id: Uuid, ttl_secs: i64) -> Self {
        let now = Timestamp::now().as_second();
        Self {
            issued_by: Cow::Borrowed(JWT_ISSUER),
            account_id,
            issued_at: now,
            expires_at: now + ttl_secs,
        }
    }

    /// Checks if the token has expired.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now().as_second()
    }
}

/// Signing and verification keys for authentication tokens.
///
/// Constructed once at process start from the configured secret and shared
/// through the service state.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl AuthKeys {
    /// Creates keys from a shared secret.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Overrides the token lifetime.
    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Issues a signed token for an account.
    pub fn issue(&self, account_id: Uuid) -> Result<String> {
        let claims = AuthClaims::new(account_id, self.ttl_secs);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                account_id = %account_id,
                "failed to encode auth token"
            );
            ErrorKind::InternalServerError.with_message("Failed to issue token")
        })
    }

    /// Verifies a token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<AuthClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[JWT_ISSUER]);

        let data = decode::<AuthClaims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                "token verification failed"
            );
            ErrorKind::Unauthorized.with_message("Invalid or expired token")
        })?;

        Ok(data.claims)
    }
}

impl std::fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthKeys")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

/// Authenticated request state.
///
/// Extracting [`AuthState`] succeeds only for requests carrying a valid
/// bearer token; handlers taking it are authenticated by construction.
#[derive(Debug, Clone, Deref)]
pub struct AuthState(pub AuthClaims);

impl<S> FromRequestParts<S> for AuthState
where
    S: Send + Sync,
    AuthKeys: FromRef<S>,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ErrorKind::Unauthorized.with_message("Missing authorization header")
                })?;

        let keys = AuthKeys::from_ref(state);
        let claims = keys.verify(bearer.token())?;

        Ok(AuthState(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips() {
        let keys = AuthKeys::from_secret(b"test-secret");
        let account_id = Uuid::new_v4();

        let token = keys.issue(account_id).expect("issue");
        let claims = keys.verify(&token).expect("verify");

        assert_eq!(claims.account_id, account_id);
        assert!(!claims.is_expired());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let keys = AuthKeys::from_secret(b"test-secret");
        let other_keys = AuthKeys::from_secret(b"other-secret");

        let token = keys.issue(Uuid::new_v4()).expect("issue");
        assert!(other_keys.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let keys = AuthKeys::from_secret(b"test-secret");
        assert!(keys.verify("not-a-token").is_err());
    }
}
