#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use axum::http::StatusCode;
use serde_json::json;
use shorthands_test_fixtures::{
    body_json, create_test_app, create_test_state, get_request, login_organization, login_user,
    post_json, register_organization, register_user,
};
use shorthands_types::IdGenerator;
use tower::ServiceExt;

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let _ = IdGenerator::init(20);
    let state = create_test_state();
    let app = create_test_app(state);

    let response = app.clone().oneshot(get_request("/users/current", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "AUTHENTICATION_ERROR");
    assert_eq!(json["error"]["message"], "Access denied. No token provided.");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let _ = IdGenerator::init(20);
    let state = create_test_state();
    let app = create_test_app(state);

    let response = app
        .clone()
        .oneshot(get_request("/users/current", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["message"], "Invalid token.");
}

#[tokio::test]
async fn test_token_signed_with_wrong_secret_is_rejected() {
    let _ = IdGenerator::init(20);
    let state = create_test_state();
    let app = create_test_app(state);

    let claims = shorthands_core::AuthTokenClaims::builder()
        .principal_id(12345)
        .role(shorthands_core::PrincipalKind::User)
        .name("imposter".to_string())
        .ttl_hours(1)
        .build();
    let forged = shorthands_core::token::sign(&claims, "some-other-secret").unwrap();

    let response =
        app.clone().oneshot(get_request("/users/current", Some(&forged))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Invalid token.");
}

#[tokio::test]
async fn test_user_login_returns_working_token() {
    let _ = IdGenerator::init(20);
    let state = create_test_state();
    let app = create_test_app(state);

    register_user(&app, "sam", "userpassword").await;

    let token = login_user(&app, "sam", "userpassword").await;
    let response = app.clone().oneshot(get_request("/users/current", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "sam");
}

#[tokio::test]
async fn test_organization_login_returns_working_token() {
    let _ = IdGenerator::init(20);
    let state = create_test_state();
    let app = create_test_app(state);

    register_organization(&app, "vandelay", "orgpassword").await;

    let token = login_organization(&app, "vandelay", "orgpassword").await;
    let response = app
        .clone()
        .oneshot(get_request("/organizations/current", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "vandelay");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let _ = IdGenerator::init(20);
    let state = create_test_state();
    let app = create_test_app(state);

    register_user(&app, "tess", "userpassword").await;

    let response = app
        .clone()
        .oneshot(post_json("/auth/users", None, json!({ "username": "tess", "password": "wrong" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Invalid username or password.");
}

#[tokio::test]
async fn test_login_with_unknown_name_uses_same_message() {
    let _ = IdGenerator::init(20);
    let state = create_test_state();
    let app = create_test_app(state);

    // Unknown principals and wrong passwords are indistinguishable
    let response = app
        .clone()
        .oneshot(post_json("/auth/users", None, json!({ "username": "ghost", "password": "whatever" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Invalid username or password.");

    let response = app
        .clone()
        .oneshot(post_json("/auth/organizations", None, json!({ "name": "ghost", "password": "whatever" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Invalid name or password.");
}

#[tokio::test]
async fn test_role_enforcement_on_current_endpoints() {
    let _ = IdGenerator::init(20);
    let state = create_test_state();
    let app = create_test_app(state);

    let org_token = register_organization(&app, "prestige", "orgpassword").await;
    let user_token = register_user(&app, "uma", "userpassword").await;

    let response =
        app.clone().oneshot(get_request("/users/current", Some(&org_token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "This endpoint is only available to users.");

    let response = app
        .clone()
        .oneshot(get_request("/organizations/current", Some(&user_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "This endpoint is only available to organizations.");
}

#[tokio::test]
async fn test_healthz_requires_no_token() {
    let _ = IdGenerator::init(20);
    let state = create_test_state();
    let app = create_test_app(state);

    let response = app.clone().oneshot(get_request("/healthz", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
