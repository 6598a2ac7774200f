use std::sync::Arc;

use axum::{Json, extract::State};
use bon::Builder;
use serde::Deserialize;
use shorthands_config::Config;
use shorthands_core::{
    OrganizationRepository, PrincipalKind, UserRepository, password, token,
    token::AuthTokenClaims,
};
use shorthands_storage::Backend;
use shorthands_types::{
    Error,
    entities::{MAX_PASSWORD_LEN, MIN_PASSWORD_LEN},
};

use crate::error::Result;

/// Shared application state for all handlers
#[derive(Clone, Builder)]
pub struct AppState {
    /// Storage backend
    pub storage: Arc<Backend>,
    /// Server configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create an AppState for tests: in-memory storage and a fixed secret
    pub fn new_test(storage: Arc<Backend>) -> Self {
        let config = Config::builder().jwt_secret("test-jwt-secret").build();
        AppState::builder().storage(storage).config(Arc::new(config)).build()
    }
}

/// Check password length bounds shared by registration and password changes
///
/// Bounds are counted in characters, not bytes, so multibyte passwords at
/// the limits are treated the same as ASCII ones.
pub(crate) fn validate_password(password: &str) -> Result<()> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LEN || length > MAX_PASSWORD_LEN {
        return Err(Error::validation(format!(
            "Password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters."
        ))
        .into());
    }
    Ok(())
}

/// Issue a signed auth token for a principal
pub(crate) fn issue_token(
    state: &AppState,
    principal_id: i64,
    kind: PrincipalKind,
    name: &str,
) -> Result<String> {
    let claims = AuthTokenClaims::builder()
        .principal_id(principal_id)
        .role(kind)
        .name(name.to_string())
        .ttl_hours(state.config.token_ttl_hours)
        .build();
    Ok(token::sign(&claims, &state.config.jwt_secret)?)
}

#[derive(Debug, Deserialize)]
pub struct UserLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct OrganizationLoginRequest {
    pub name: String,
    pub password: String,
}

/// Log in as a user
///
/// POST /auth/users
///
/// Returns the auth token as the response body. Unknown names and wrong
/// passwords get the same answer.
pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<UserLoginRequest>,
) -> Result<String> {
    let repo = UserRepository::new((*state.storage).clone());
    let user = repo
        .get_by_username(&payload.username)
        .await?
        .ok_or_else(|| Error::validation("Invalid username or password."))?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        return Err(Error::validation("Invalid username or password.").into());
    }

    issue_token(&state, user.id, PrincipalKind::User, &user.username)
}

/// Log in as an organization
///
/// POST /auth/organizations
pub async fn login_organization(
    State(state): State<AppState>,
    Json(payload): Json<OrganizationLoginRequest>,
) -> Result<String> {
    let repo = OrganizationRepository::new((*state.storage).clone());
    let org = repo
        .get_by_name(&payload.name)
        .await?
        .ok_or_else(|| Error::validation("Invalid name or password."))?;

    if !password::verify_password(&payload.password, &org.password_hash)? {
        return Err(Error::validation("Invalid name or password.").into());
    }

    issue_token(&state, org.id, PrincipalKind::Organization, &org.name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_bounds() {
        assert!(validate_password("abc").is_err());
        assert!(validate_password("abcd").is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LEN)).is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LEN + 1)).is_err());
    }

    #[test]
    fn test_password_bounds_count_characters_not_bytes() {
        // Four two-byte characters are within the minimum
        assert!(validate_password("żółć").is_ok());
        assert!(validate_password("żół").is_err());

        // A non-ASCII password of exactly the maximum character count is
        // accepted even though its byte length exceeds the bound
        assert!(validate_password(&"ż".repeat(MAX_PASSWORD_LEN)).is_ok());
        assert!(validate_password(&"ż".repeat(MAX_PASSWORD_LEN + 1)).is_err());
    }
}
