use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shorthands_core::ShortRepository;
use shorthands_types::{Error, entities::Short};

use crate::{
    error::Result,
    handlers::AppState,
    middleware::{AuthContext, require_organization},
};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateShortRequest {
    pub shorthand: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct EditShortRequest {
    pub id: i64,
    pub shorthand: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteShortRequest {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct ShortResponse {
    pub id: i64,
    pub organization_id: i64,
    pub shorthand: String,
    pub description: String,
    pub upvotes: u32,
    pub downvotes: u32,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ListShortsResponse {
    pub shorts: Vec<ShortResponse>,
}

pub(crate) fn short_to_response(short: Short) -> ShortResponse {
    ShortResponse {
        id: short.id,
        organization_id: short.organization_id,
        shorthand: short.shorthand,
        description: short.description,
        upvotes: short.upvotes,
        downvotes: short.downvotes,
        created_at: short.created_at.to_rfc3339(),
    }
}

/// Load a short and check it belongs to the calling organization
async fn load_owned_short(state: &AppState, ctx: &AuthContext, id: i64) -> Result<Short> {
    let repo = ShortRepository::new((*state.storage).clone());
    let short = repo.get(id).await?.ok_or_else(|| Error::not_found("Short not found."))?;

    if short.organization_id != ctx.principal_id {
        return Err(Error::forbidden("This short belongs to another organization.").into());
    }

    Ok(short)
}

// ============================================================================
// Short Endpoints
// ============================================================================

/// List all of the authenticated organization's shorts
///
/// GET /shorts/all
pub async fn list_shorts(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ListShortsResponse>> {
    require_organization(&ctx)?;

    let repo = ShortRepository::new((*state.storage).clone());
    let mut shorts = repo.list_for_organization(ctx.principal_id).await?;
    shorts.sort_by(|a, b| a.shorthand.to_lowercase().cmp(&b.shorthand.to_lowercase()));

    Ok(Json(ListShortsResponse { shorts: shorts.into_iter().map(short_to_response).collect() }))
}

/// Get a single short owned by the authenticated organization
///
/// GET /shorts/{id}
pub async fn get_short(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<ShortResponse>> {
    require_organization(&ctx)?;

    let short = load_owned_short(&state, &ctx, id).await?;
    Ok(Json(short_to_response(short)))
}

/// Create a short in the authenticated organization's glossary
///
/// POST /shorts/create
pub async fn create_short(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<CreateShortRequest>,
) -> Result<Json<ShortResponse>> {
    require_organization(&ctx)?;

    let short = Short::builder()
        .organization_id(ctx.principal_id)
        .shorthand(payload.shorthand.trim())
        .description(payload.description.trim())
        .build();
    short.validate()?;

    let repo = ShortRepository::new((*state.storage).clone());
    repo.create(short.clone()).await?;

    Ok(Json(short_to_response(short)))
}

/// Edit an existing short
///
/// POST /shorts/edit
pub async fn edit_short(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<EditShortRequest>,
) -> Result<String> {
    require_organization(&ctx)?;

    let mut short = load_owned_short(&state, &ctx, payload.id).await?;
    if let Some(shorthand) = payload.shorthand {
        short.shorthand = shorthand.trim().to_string();
    }
    if let Some(description) = payload.description {
        short.description = description.trim().to_string();
    }
    short.validate()?;

    let repo = ShortRepository::new((*state.storage).clone());
    repo.update(short).await?;

    Ok("Short updated successfully.".to_string())
}

/// Delete a short
///
/// POST /shorts/delete
pub async fn delete_short(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<DeleteShortRequest>,
) -> Result<String> {
    require_organization(&ctx)?;

    let short = load_owned_short(&state, &ctx, payload.id).await?;

    let repo = ShortRepository::new((*state.storage).clone());
    repo.delete(short.id).await?;

    Ok("Short deleted successfully.".to_string())
}
