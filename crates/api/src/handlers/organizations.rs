use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use shorthands_core::{OrganizationRepository, PrincipalKind, password};
use shorthands_types::{
    Error,
    entities::{MemberEntry, Organization},
};

use crate::{
    error::Result,
    handlers::{AppState, auth},
    middleware::{AuthContext, require_organization},
};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EditOrganizationRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteOrganizationRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub id: i64,
    pub name: String,
    pub users: Vec<MemberEntry>,
    pub created_at: String,
}

pub(crate) fn org_to_response(org: Organization) -> OrganizationResponse {
    OrganizationResponse {
        id: org.id,
        name: org.name,
        users: org.users,
        created_at: org.created_at.to_rfc3339(),
    }
}

async fn load_organization(state: &AppState, id: i64) -> Result<Organization> {
    let repo = OrganizationRepository::new((*state.storage).clone());
    Ok(repo.get(id).await?.ok_or_else(|| Error::not_found("Organization not found."))?)
}

// ============================================================================
// Organization Endpoints
// ============================================================================

/// Register a new organization
///
/// POST /organizations/create (public)
pub async fn create_organization(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> Result<([(&'static str, String); 1], Json<OrganizationResponse>)> {
    auth::validate_password(&payload.password)?;

    let org = Organization::builder()
        .name(payload.name.trim())
        .password_hash(password::hash_password(&payload.password)?)
        .build();
    org.validate()?;

    let repo = OrganizationRepository::new((*state.storage).clone());
    repo.create(org.clone()).await?;

    let token = auth::issue_token(&state, org.id, PrincipalKind::Organization, &org.name)?;

    Ok(([("x-auth-token", token)], Json(org_to_response(org))))
}

/// Get the authenticated organization's own record, members included
///
/// GET /organizations/current
pub async fn get_current_organization(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<OrganizationResponse>> {
    require_organization(&ctx)?;

    let org = load_organization(&state, ctx.principal_id).await?;
    Ok(Json(org_to_response(org)))
}

/// Change the authenticated organization's name
///
/// POST /organizations/edit
pub async fn edit_organization(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<EditOrganizationRequest>,
) -> Result<String> {
    require_organization(&ctx)?;

    let mut org = load_organization(&state, ctx.principal_id).await?;
    org.name = payload.name.trim().to_string();
    org.validate()?;

    let repo = OrganizationRepository::new((*state.storage).clone());
    repo.update(org).await?;

    Ok("Organization updated successfully.".to_string())
}

/// Change the authenticated organization's password
///
/// POST /organizations/change_password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<String> {
    require_organization(&ctx)?;
    auth::validate_password(&payload.new_password)?;

    let mut org = load_organization(&state, ctx.principal_id).await?;
    if !password::verify_password(&payload.current_password, &org.password_hash)? {
        return Err(Error::validation("Current password is incorrect.").into());
    }

    org.password_hash = password::hash_password(&payload.new_password)?;

    let repo = OrganizationRepository::new((*state.storage).clone());
    repo.update(org).await?;

    Ok("Password changed successfully.".to_string())
}

/// Delete the authenticated organization, confirmed by password
///
/// POST /organizations/delete
pub async fn delete_organization(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<DeleteOrganizationRequest>,
) -> Result<String> {
    require_organization(&ctx)?;

    let org = load_organization(&state, ctx.principal_id).await?;
    if !password::verify_password(&payload.password, &org.password_hash)? {
        return Err(Error::validation("Password is incorrect.").into());
    }

    let repo = OrganizationRepository::new((*state.storage).clone());
    repo.delete(org.id).await?;

    Ok("Organization has been deleted.".to_string())
}
