// Test fixtures are allowed to use unwrap/expect for clear failure messages
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Test fixtures and utilities for Shorthands API integration tests.
//!
//! This crate provides shared test helpers to eliminate duplication across
//! integration tests. All functions are designed to work with the
//! Axum-based API and MemoryBackend storage.
//!
//! # Usage
//!
//! ```ignore
//! use shorthands_test_fixtures::{create_test_state, create_test_app, register_user};
//! use shorthands_types::IdGenerator;
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let _ = IdGenerator::init(1);
//!     let state = create_test_state();
//!     let app = create_test_app(state);
//!
//!     let token = register_user(&app, "bob", "password123").await;
//!     // Pass the token in the x-auth-token header for authenticated requests...
//! }
//! ```

#![deny(unsafe_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use shorthands_api::{AppState, create_router_with_state};
use shorthands_storage::Backend;
use tower::ServiceExt;

/// Creates a test AppState with in-memory storage backend.
pub fn create_test_state() -> AppState {
    let backend = Backend::memory();
    AppState::new_test(Arc::new(backend))
}

/// Creates a fully configured Axum router with all middleware and routes.
///
/// Use with `tower::ServiceExt::oneshot` to drive test requests.
pub fn create_test_app(state: AppState) -> axum::Router {
    create_router_with_state(state)
}

/// Builds a JSON POST request.
pub fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder =
        Request::builder().method("POST").uri(uri).header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("x-auth-token", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Builds a GET request.
pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("x-auth-token", token);
    }
    builder.body(Body::empty()).unwrap()
}

/// Extracts the auth token from the `x-auth-token` response header.
pub fn extract_auth_token(headers: &axum::http::HeaderMap) -> Option<String> {
    headers.get("x-auth-token").and_then(|v| v.to_str().ok()).map(|s| s.to_string())
}

/// Parses an HTTP response body as JSON.
///
/// # Panics
///
/// Panics if the body cannot be read or parsed as valid JSON.
pub async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Reads an HTTP response body as a UTF-8 string.
///
/// # Panics
///
/// Panics if the body cannot be read or is not valid UTF-8.
pub async fn body_text(response: axum::http::Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Registers a new user and returns their auth token.
///
/// # Panics
///
/// Panics if registration fails or no token is returned.
pub async fn register_user(app: &axum::Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/users/create",
            None,
            json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "User registration should succeed");
    extract_auth_token(response.headers()).expect("Auth token should be set")
}

/// Registers a new organization and returns its auth token.
///
/// # Panics
///
/// Panics if registration fails or no token is returned.
pub async fn register_organization(app: &axum::Router, name: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/organizations/create",
            None,
            json!({ "name": name, "password": password }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "Organization registration should succeed");
    extract_auth_token(response.headers()).expect("Auth token should be set")
}

/// Logs in a user and returns their auth token (the response body).
///
/// # Panics
///
/// Panics if login fails.
pub async fn login_user(app: &axum::Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/users",
            None,
            json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "Login should succeed");
    body_text(response).await
}

/// Logs in an organization and returns its auth token.
///
/// # Panics
///
/// Panics if login fails.
pub async fn login_organization(app: &axum::Router, name: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json("/auth/organizations", None, json!({ "name": name, "password": password })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "Login should succeed");
    body_text(response).await
}

/// Gets a principal's own ID via its `current` endpoint.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn current_id(app: &axum::Router, token: &str, path: &str) -> i64 {
    let response = app.clone().oneshot(get_request(path, Some(token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().expect("Should have an ID")
}

/// Sends an invitation and returns the invitation ID found in the
/// organization's pending list.
///
/// # Panics
///
/// Panics if the invitation fails.
pub async fn invite_user(app: &axum::Router, org_token: &str, user_id: i64) -> i64 {
    let response = app
        .clone()
        .oneshot(post_json("/invitations/create", Some(org_token), json!({ "user_id": user_id })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Invitation should succeed");

    let response = app
        .clone()
        .oneshot(get_request("/invitations/all/organization/pending", Some(org_token)))
        .await
        .unwrap();
    let json = body_json(response).await;
    json["invitations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["user_id"].as_i64() == Some(user_id))
        .and_then(|i| i["id"].as_i64())
        .expect("Invitation should be listed as pending")
}
