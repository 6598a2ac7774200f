use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    handlers::{AppState, auth, health, invitations, organizations, search, shorts, users},
    middleware::{logging_middleware, require_auth},
};

/// Create router with state and middleware applied
///
/// The auth middleware is applied only to protected routes, leaving the
/// registration, login, and health endpoints reachable without a token.
pub fn create_router_with_state(state: AppState) -> axum::Router {
    let protected = Router::new()
        // User account routes
        .route("/users/current", get(users::get_current_user))
        .route("/users/edit", post(users::edit_user))
        .route("/users/change_password", post(users::change_password))
        .route("/users/delete", post(users::delete_user))
        // Organization account routes
        .route("/organizations/current", get(organizations::get_current_organization))
        .route("/organizations/edit", post(organizations::edit_organization))
        .route("/organizations/change_password", post(organizations::change_password))
        .route("/organizations/delete", post(organizations::delete_organization))
        // Invitation routes
        .route("/invitations/create", post(invitations::create_invitation))
        .route("/invitations/modify", post(invitations::modify_invitation))
        .route("/invitations/delete", post(invitations::delete_invitation))
        .route("/invitations/all/user", get(invitations::list_user_invitations))
        .route(
            "/invitations/all/user/{status}",
            get(invitations::list_user_invitations_by_status),
        )
        .route("/invitations/all/organization", get(invitations::list_organization_invitations))
        .route(
            "/invitations/all/organization/{status}",
            get(invitations::list_organization_invitations_by_status),
        )
        // Glossary routes
        .route("/shorts/all", get(shorts::list_shorts))
        .route("/shorts/create", post(shorts::create_short))
        .route("/shorts/edit", post(shorts::edit_short))
        .route("/shorts/delete", post(shorts::delete_short))
        .route("/shorts/{id}", get(shorts::get_short))
        // Search routes
        .route("/search/users/{username}", get(search::search_users))
        .route("/search/organizations/{name}", get(search::search_organizations))
        .route("/search/shorts", get(search::search_shorts))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        // Health check endpoint (no authentication)
        .route("/healthz", get(health::healthz_handler))
        // Registration and login endpoints
        .route("/users/create", post(users::create_user))
        .route("/organizations/create", post(organizations::create_organization))
        .route("/auth/users", post(auth::login_user))
        .route("/auth/organizations", post(auth::login_organization))
        .with_state(state)
        .merge(protected)
        // Add logging middleware to log all requests
        .layer(middleware::from_fn(logging_middleware))
}
