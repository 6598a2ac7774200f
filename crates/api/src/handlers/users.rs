use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use shorthands_core::{PrincipalKind, UserRepository, password};
use shorthands_types::{
    Error,
    entities::{MembershipEntry, User},
};

use crate::{
    error::Result,
    handlers::{AppState, auth},
    middleware::{AuthContext, require_user},
};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EditUserRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub organizations: Vec<MembershipEntry>,
    pub created_at: String,
}

pub(crate) fn user_to_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        organizations: user.organizations,
        created_at: user.created_at.to_rfc3339(),
    }
}

async fn load_user(state: &AppState, id: i64) -> Result<User> {
    let repo = UserRepository::new((*state.storage).clone());
    Ok(repo.get(id).await?.ok_or_else(|| Error::not_found("User not found."))?)
}

// ============================================================================
// User Endpoints
// ============================================================================

/// Register a new user
///
/// POST /users/create (public)
///
/// The auth token is returned in the `x-auth-token` response header, with
/// the created user (password hash omitted) as the body.
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<([(&'static str, String); 1], Json<UserResponse>)> {
    auth::validate_password(&payload.password)?;

    let user = User::builder()
        .username(payload.username.trim())
        .password_hash(password::hash_password(&payload.password)?)
        .build();
    user.validate()?;

    let repo = UserRepository::new((*state.storage).clone());
    repo.create(user.clone()).await?;

    let token = auth::issue_token(&state, user.id, PrincipalKind::User, &user.username)?;

    Ok(([("x-auth-token", token)], Json(user_to_response(user))))
}

/// Get the authenticated user's own record
///
/// GET /users/current
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<UserResponse>> {
    require_user(&ctx)?;

    let user = load_user(&state, ctx.principal_id).await?;
    Ok(Json(user_to_response(user)))
}

/// Change the authenticated user's username
///
/// POST /users/edit
pub async fn edit_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<EditUserRequest>,
) -> Result<String> {
    require_user(&ctx)?;

    let mut user = load_user(&state, ctx.principal_id).await?;
    user.username = payload.username.trim().to_string();
    user.validate()?;

    let repo = UserRepository::new((*state.storage).clone());
    repo.update(user).await?;

    Ok("User updated successfully.".to_string())
}

/// Change the authenticated user's password
///
/// POST /users/change_password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<String> {
    require_user(&ctx)?;
    auth::validate_password(&payload.new_password)?;

    let mut user = load_user(&state, ctx.principal_id).await?;
    if !password::verify_password(&payload.current_password, &user.password_hash)? {
        return Err(Error::validation("Current password is incorrect.").into());
    }

    user.password_hash = password::hash_password(&payload.new_password)?;

    let repo = UserRepository::new((*state.storage).clone());
    repo.update(user).await?;

    Ok("Password changed successfully.".to_string())
}

/// Delete the authenticated user's account, confirmed by password
///
/// POST /users/delete
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<DeleteUserRequest>,
) -> Result<String> {
    require_user(&ctx)?;

    let user = load_user(&state, ctx.principal_id).await?;
    if !password::verify_password(&payload.password, &user.password_hash)? {
        return Err(Error::validation("Password is incorrect.").into());
    }

    let repo = UserRepository::new((*state.storage).clone());
    repo.delete(user.id).await?;

    Ok("Your account has been deleted.".to_string())
}
