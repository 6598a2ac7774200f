use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shorthands_core::{PrincipalKind, token};
use shorthands_types::Error;

use crate::{error::ApiError, handlers::AppState};

/// Context for authenticated requests
///
/// Attached to request extensions by [`require_auth`]; handlers read it
/// via `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated principal's ID
    pub principal_id: i64,
    /// Whether the token belongs to a user or an organization
    pub kind: PrincipalKind,
    /// Display name at token issue time
    pub name: String,
}

/// Authentication middleware
///
/// Reads the `x-auth-token` header and attaches an [`AuthContext`] to the
/// request. A missing token is 401; a token that fails verification
/// (tampered, expired, malformed) is 400, as the client contract demands.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get("x-auth-token")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::auth("Access denied. No token provided."))?;

    let claims = token::verify(token, &state.config.jwt_secret)?;
    let principal_id = claims.principal_id()?;

    request.extensions_mut().insert(AuthContext {
        principal_id,
        kind: claims.role,
        name: claims.name,
    });

    Ok(next.run(request).await)
}

/// Require the caller to be a user principal
pub fn require_user(ctx: &AuthContext) -> Result<(), ApiError> {
    if ctx.kind != PrincipalKind::User {
        return Err(Error::forbidden("This endpoint is only available to users.").into());
    }
    Ok(())
}

/// Require the caller to be an organization principal
pub fn require_organization(ctx: &AuthContext) -> Result<(), ApiError> {
    if ctx.kind != PrincipalKind::Organization {
        return Err(Error::forbidden("This endpoint is only available to organizations.").into());
    }
    Ok(())
}
