//! Auth token signing and verification.
//!
//! Tokens are HS256 JWTs carried in the `x-auth-token` header. The subject
//! is the principal's Snowflake ID as a string; `role` distinguishes user
//! tokens from organization tokens.

use bon::bon;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shorthands_types::error::{Error, Result};

/// The kind of principal a token authenticates
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PrincipalKind {
    User,
    Organization,
}

/// Claims carried by a Shorthands auth token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokenClaims {
    /// Subject: the principal's Snowflake ID as a string
    pub sub: String,
    /// Whether this token belongs to a user or an organization
    pub role: PrincipalKind,
    /// Display name at issue time
    pub name: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

#[bon]
impl AuthTokenClaims {
    /// Create new auth token claims
    #[builder]
    pub fn new(principal_id: i64, role: PrincipalKind, name: String, ttl_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(ttl_hours);

        Self {
            sub: principal_id.to_string(),
            role,
            name,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }

    /// The principal ID this token was issued to
    pub fn principal_id(&self) -> Result<i64> {
        self.sub.parse().map_err(|_| Error::validation("Invalid token."))
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }

    /// Get expiration time as DateTime
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Sign claims into a compact JWT
pub fn sign(claims: &AuthTokenClaims, secret: &str) -> Result<String> {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| Error::internal(format!("Failed to sign auth token: {e}")))
}

/// Verify a JWT and extract its claims
///
/// Expired or tampered tokens surface as validation errors, which the
/// HTTP layer maps to 400 (the contract never distinguishes why a
/// presented token is unusable).
pub fn verify(token: &str, secret: &str) -> Result<AuthTokenClaims> {
    let validation = Validation::new(Algorithm::HS256);

    let data =
        decode::<AuthTokenClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map_err(|_| Error::validation("Invalid token."))?;

    Ok(data.claims)
}
