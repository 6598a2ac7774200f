use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shorthands_core::{OrganizationRepository, PrincipalKind, ShortRepository, UserRepository};
use shorthands_types::Error;

use crate::{
    error::Result,
    handlers::{
        AppState,
        organizations::{OrganizationResponse, org_to_response},
        shorts::{ListShortsResponse, short_to_response},
        users::{UserResponse, user_to_response},
    },
    middleware::AuthContext,
};

#[derive(Debug, Deserialize)]
pub struct SearchShortsQuery {
    pub organization_id: i64,
    pub shorthand: Option<String>,
}

/// Look up a user by exact username
///
/// GET /search/users/{username}
///
/// Available to any authenticated principal; the password hash is never
/// included in the response.
pub async fn search_users(
    State(state): State<AppState>,
    Extension(_ctx): Extension<AuthContext>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>> {
    let repo = UserRepository::new((*state.storage).clone());
    let user = repo
        .get_by_username(&username)
        .await?
        .ok_or_else(|| Error::not_found("User not found."))?;

    Ok(Json(user_to_response(user)))
}

/// Look up an organization by exact name
///
/// GET /search/organizations/{name}
pub async fn search_organizations(
    State(state): State<AppState>,
    Extension(_ctx): Extension<AuthContext>,
    Path(name): Path<String>,
) -> Result<Json<OrganizationResponse>> {
    let repo = OrganizationRepository::new((*state.storage).clone());
    let org =
        repo.get_by_name(&name).await?.ok_or_else(|| Error::not_found("Organization not found."))?;

    Ok(Json(org_to_response(org)))
}

/// Search an organization's glossary
///
/// GET /search/shorts?organization_id=..&shorthand=..
///
/// Restricted to the organization itself and its members. The shorthand
/// filter is a case-insensitive substring match; results sort by
/// shorthand.
pub async fn search_shorts(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<SearchShortsQuery>,
) -> Result<Json<ListShortsResponse>> {
    match ctx.kind {
        PrincipalKind::Organization => {
            if ctx.principal_id != query.organization_id {
                return Err(Error::forbidden(
                    "You can only search your own organization's shorts.",
                )
                .into());
            }
        },
        PrincipalKind::User => {
            let repo = UserRepository::new((*state.storage).clone());
            let user = repo
                .get(ctx.principal_id)
                .await?
                .ok_or_else(|| Error::not_found("User not found."))?;
            if !user.is_member_of(query.organization_id) {
                return Err(Error::forbidden("You are not a member of this organization.").into());
            }
        },
    }

    let repo = ShortRepository::new((*state.storage).clone());
    let mut shorts = repo.list_for_organization(query.organization_id).await?;

    if let Some(filter) = query.shorthand.as_deref() {
        let needle = filter.trim().to_lowercase();
        shorts.retain(|s| s.shorthand.to_lowercase().contains(&needle));
    }
    shorts.sort_by(|a, b| a.shorthand.to_lowercase().cmp(&b.shorthand.to_lowercase()));

    Ok(Json(ListShortsResponse { shorts: shorts.into_iter().map(short_to_response).collect() }))
}
