use std::str::FromStr;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shorthands_core::InvitationLedger;
use shorthands_types::{
    Error,
    entities::{Invitation, InvitationStatus},
};

use crate::{
    error::Result,
    handlers::AppState,
    middleware::{AuthContext, require_organization, require_user},
};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateInvitationRequest {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ModifyInvitationRequest {
    pub id: i64,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteInvitationRequest {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub id: i64,
    pub organization_id: i64,
    pub organization_name: String,
    pub user_id: i64,
    pub username: String,
    pub status: InvitationStatus,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ListInvitationsResponse {
    pub invitations: Vec<InvitationResponse>,
}

fn invitation_to_response(invitation: Invitation) -> InvitationResponse {
    InvitationResponse {
        id: invitation.id,
        organization_id: invitation.organization_id,
        organization_name: invitation.organization_name,
        user_id: invitation.user_id,
        username: invitation.username,
        status: invitation.status,
        created_at: invitation.created_at.to_rfc3339(),
    }
}

fn parse_status(raw: &str) -> Result<InvitationStatus> {
    Ok(InvitationStatus::from_str(raw)
        .map_err(|_| Error::validation("Status must be pending, accepted, or rejected."))?)
}

fn ledger(state: &AppState) -> InvitationLedger<shorthands_storage::Backend> {
    InvitationLedger::new((*state.storage).clone())
}

// ============================================================================
// Invitation Endpoints
// ============================================================================

/// Invite a user to the authenticated organization
///
/// POST /invitations/create
pub async fn create_invitation(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<CreateInvitationRequest>,
) -> Result<String> {
    require_organization(&ctx)?;

    let invitation = ledger(&state).create(ctx.principal_id, payload.user_id).await?;

    Ok(format!("Invite sent successfully to {}.", invitation.username))
}

/// Accept or reject an invitation addressed to the authenticated user
///
/// POST /invitations/modify
pub async fn modify_invitation(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<ModifyInvitationRequest>,
) -> Result<String> {
    require_user(&ctx)?;

    let target = parse_status(&payload.status)?;
    let invitation = ledger(&state).resolve(payload.id, target, ctx.principal_id).await?;

    Ok(format!("Invitation {} successfully.", invitation.status))
}

/// Withdraw an invitation sent by the authenticated organization
///
/// POST /invitations/delete
pub async fn delete_invitation(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<DeleteInvitationRequest>,
) -> Result<String> {
    require_organization(&ctx)?;

    ledger(&state).withdraw(payload.id, ctx.principal_id).await?;

    Ok("Invitation deleted successfully.".to_string())
}

/// List the authenticated user's invitations
///
/// GET /invitations/all/user
pub async fn list_user_invitations(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ListInvitationsResponse>> {
    require_user(&ctx)?;

    let invitations = ledger(&state).list_for_user(ctx.principal_id, None).await?;
    Ok(Json(ListInvitationsResponse {
        invitations: invitations.into_iter().map(invitation_to_response).collect(),
    }))
}

/// List the authenticated user's invitations with a given status
///
/// GET /invitations/all/user/{status}
pub async fn list_user_invitations_by_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(status): Path<String>,
) -> Result<Json<ListInvitationsResponse>> {
    require_user(&ctx)?;

    let status = parse_status(&status)?;
    let invitations = ledger(&state).list_for_user(ctx.principal_id, Some(status)).await?;
    Ok(Json(ListInvitationsResponse {
        invitations: invitations.into_iter().map(invitation_to_response).collect(),
    }))
}

/// List the authenticated organization's invitations
///
/// GET /invitations/all/organization
pub async fn list_organization_invitations(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ListInvitationsResponse>> {
    require_organization(&ctx)?;

    let invitations = ledger(&state).list_for_organization(ctx.principal_id, None).await?;
    Ok(Json(ListInvitationsResponse {
        invitations: invitations.into_iter().map(invitation_to_response).collect(),
    }))
}

/// List the authenticated organization's invitations with a given status
///
/// GET /invitations/all/organization/{status}
pub async fn list_organization_invitations_by_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(status): Path<String>,
) -> Result<Json<ListInvitationsResponse>> {
    require_organization(&ctx)?;

    let status = parse_status(&status)?;
    let invitations = ledger(&state).list_for_organization(ctx.principal_id, Some(status)).await?;
    Ok(Json(ListInvitationsResponse {
        invitations: invitations.into_iter().map(invitation_to_response).collect(),
    }))
}
