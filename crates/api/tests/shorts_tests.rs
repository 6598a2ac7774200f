#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use axum::http::StatusCode;
use serde_json::json;
use shorthands_test_fixtures::{
    body_json, body_text, create_test_app, create_test_state, get_request, post_json,
    register_organization, register_user,
};
use shorthands_types::IdGenerator;
use tower::ServiceExt;

async fn create_short(
    app: &axum::Router,
    token: &str,
    shorthand: &str,
    description: &str,
) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(post_json(
            "/shorts/create",
            Some(token),
            json!({ "shorthand": shorthand, "description": description }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Short creation should succeed");
    body_json(response).await
}

#[tokio::test]
async fn test_create_and_get_short() {
    let _ = IdGenerator::init(40);
    let state = create_test_state();
    let app = create_test_app(state);

    let token = register_organization(&app, "acme", "orgpassword").await;

    let created = create_short(&app, &token, "ETA", "Estimated time of arrival").await;
    assert_eq!(created["shorthand"], "ETA");
    assert_eq!(created["description"], "Estimated time of arrival");
    assert_eq!(created["upvotes"], 0);
    assert_eq!(created["downvotes"], 0);
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/shorts/{id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["shorthand"], "ETA");
}

#[tokio::test]
async fn test_shorthand_unique_per_organization() {
    let _ = IdGenerator::init(40);
    let state = create_test_state();
    let app = create_test_app(state);

    let acme = register_organization(&app, "acme", "orgpassword").await;
    let globex = register_organization(&app, "globex", "orgpassword").await;

    create_short(&app, &acme, "ETA", "Estimated time of arrival").await;

    // Same organization, same shorthand (case-insensitive)
    let response = app
        .clone()
        .oneshot(post_json(
            "/shorts/create",
            Some(&acme),
            json!({ "shorthand": "eta", "description": "Duplicate definition" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "This shorthand already exists in your organization.");

    // A different organization can define the same shorthand
    create_short(&app, &globex, "ETA", "Estimated time of arrival").await;
}

#[tokio::test]
async fn test_create_short_rejects_invalid_input() {
    let _ = IdGenerator::init(40);
    let state = create_test_state();
    let app = create_test_app(state);

    let token = register_organization(&app, "acme", "orgpassword").await;

    // Description below the minimum length
    let response = app
        .clone()
        .oneshot(post_json(
            "/shorts/create",
            Some(&token),
            json!({ "shorthand": "ETA", "description": "hi" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Empty shorthand
    let response = app
        .clone()
        .oneshot(post_json(
            "/shorts/create",
            Some(&token),
            json!({ "shorthand": "", "description": "A valid description" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_shorts_sorted_by_shorthand() {
    let _ = IdGenerator::init(40);
    let state = create_test_state();
    let app = create_test_app(state);

    let token = register_organization(&app, "acme", "orgpassword").await;

    create_short(&app, &token, "SLA", "Service level agreement").await;
    create_short(&app, &token, "api", "Application programming interface").await;
    create_short(&app, &token, "ETA", "Estimated time of arrival").await;

    let response = app.clone().oneshot(get_request("/shorts/all", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let shorthands: Vec<&str> =
        json["shorts"].as_array().unwrap().iter().map(|s| s["shorthand"].as_str().unwrap()).collect();
    assert_eq!(shorthands, vec!["api", "ETA", "SLA"]);
}

#[tokio::test]
async fn test_edit_short() {
    let _ = IdGenerator::init(40);
    let state = create_test_state();
    let app = create_test_app(state);

    let token = register_organization(&app, "acme", "orgpassword").await;
    let created = create_short(&app, &token, "WIP", "Work in progress").await;
    let id = created["id"].as_i64().unwrap();

    // Update the description only
    let response = app
        .clone()
        .oneshot(post_json(
            "/shorts/edit",
            Some(&token),
            json!({ "id": id, "description": "Work in progress, not ready for review" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Short updated successfully.");

    let response = app
        .clone()
        .oneshot(get_request(&format!("/shorts/{id}"), Some(&token)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["shorthand"], "WIP");
    assert_eq!(json["description"], "Work in progress, not ready for review");

    // Renaming the shorthand frees the old claim
    let response = app
        .clone()
        .oneshot(post_json("/shorts/edit", Some(&token), json!({ "id": id, "shorthand": "WIP2" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    create_short(&app, &token, "WIP", "Work in progress").await;
}

#[tokio::test]
async fn test_short_ownership_is_enforced() {
    let _ = IdGenerator::init(40);
    let state = create_test_state();
    let app = create_test_app(state);

    let owner = register_organization(&app, "acme", "orgpassword").await;
    let other = register_organization(&app, "globex", "orgpassword").await;

    let created = create_short(&app, &owner, "ETA", "Estimated time of arrival").await;
    let id = created["id"].as_i64().unwrap();

    for request in [
        get_request(&format!("/shorts/{id}"), Some(&other)),
        post_json("/shorts/edit", Some(&other), json!({ "id": id, "shorthand": "STOLEN" })),
        post_json("/shorts/delete", Some(&other), json!({ "id": id })),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "This short belongs to another organization.");
    }
}

#[tokio::test]
async fn test_delete_short_releases_shorthand() {
    let _ = IdGenerator::init(40);
    let state = create_test_state();
    let app = create_test_app(state);

    let token = register_organization(&app, "acme", "orgpassword").await;
    let created = create_short(&app, &token, "ETA", "Estimated time of arrival").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/shorts/delete", Some(&token), json!({ "id": id })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Short deleted successfully.");

    let response = app
        .clone()
        .oneshot(get_request(&format!("/shorts/{id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The shorthand can be defined again
    create_short(&app, &token, "ETA", "Estimated time of arrival").await;
}

#[tokio::test]
async fn test_shorts_endpoints_require_organization_role() {
    let _ = IdGenerator::init(40);
    let state = create_test_state();
    let app = create_test_app(state);

    let user_token = register_user(&app, "bob", "userpassword").await;

    let response =
        app.clone().oneshot(get_request("/shorts/all", Some(&user_token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(post_json(
            "/shorts/create",
            Some(&user_token),
            json!({ "shorthand": "ETA", "description": "Estimated time of arrival" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
