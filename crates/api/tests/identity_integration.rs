//! Integration tests for identity endpoints
//!
//! Tests: registration validation, duplicate email rejection, login

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use sangam_api::{routes::build_router, state::AppState};
use sangam_notify::RecordingNotifier;
use sangam_store::{SqliteStore, Store};

async fn test_app() -> (Router, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::in_memory().await.unwrap());
    let state = AppState::new(store.clone(), Arc::new(RecordingNotifier::new()));
    (build_router(state), store)
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(json!({}))
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, response_json(response).await)
}

#[tokio::test]
async fn test_register_success() {
    let (app, _store) = test_app().await;

    let (status, json) = post_json(
        &app,
        "/register",
        json!({
            "username": "asha",
            "email": "asha@example.com",
            "mobile_number": "+91-9000000001"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert!(json["user_id"].as_str().unwrap().starts_with("SANGAM_"));
    assert_eq!(json["data"]["username"], "asha");
    assert_eq!(json["data"]["email"], "asha@example.com");
    assert_eq!(json["data"]["mobile_number"], "+91-9000000001");
}

#[tokio::test]
async fn test_register_rejects_missing_or_empty_fields() {
    let (app, _store) = test_app().await;

    let full = json!({
        "username": "asha",
        "email": "asha@example.com",
        "mobile_number": "+91-9000000001"
    });

    for field in ["username", "email", "mobile_number"] {
        // Missing entirely
        let mut body = full.clone();
        body.as_object_mut().unwrap().remove(field);
        let (status, json) = post_json(&app, "/register", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {field}");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "VALIDATION_ERROR");

        // Present but empty
        let mut body = full.clone();
        body[field] = json!("");
        let (status, _) = post_json(&app, "/register", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "empty {field}");
    }
}

#[tokio::test]
async fn test_register_duplicate_email_conflict() {
    let (app, _store) = test_app().await;

    let body = json!({
        "username": "asha",
        "email": "asha@example.com",
        "mobile_number": "+91-9000000001"
    });

    let (status, _) = post_json(&app, "/register", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = post_json(&app, "/register", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "CONFLICT");
}

#[tokio::test]
async fn test_fresh_user_is_active_with_empty_family() {
    let (app, store) = test_app().await;

    let (status, json) = post_json(
        &app,
        "/register",
        json!({
            "username": "asha",
            "email": "asha@example.com",
            "mobile_number": "+91-9000000001"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let user_id = json["user_id"].as_str().unwrap();
    let user = store.get_user(user_id).await.unwrap().unwrap();
    assert!(user.is_active);
    assert!(user.family_members.is_empty());
    assert!(user.last_login.is_none());
}

#[tokio::test]
async fn test_login_returns_identity_and_stamps_last_login() {
    let (app, store) = test_app().await;

    let (_, json) = post_json(
        &app,
        "/register",
        json!({
            "username": "asha",
            "email": "asha@example.com",
            "mobile_number": "+91-9000000001"
        }),
    )
    .await;
    let user_id = json["user_id"].as_str().unwrap().to_string();

    let (status, json) = post_json(&app, "/login", json!({ "user_id": user_id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["user_id"], user_id.as_str());
    assert_eq!(json["data"]["username"], "asha");
    assert_eq!(json["data"]["family_members"], json!([]));

    let user = store.get_user(&user_id).await.unwrap().unwrap();
    assert!(user.last_login.is_some());
}

#[tokio::test]
async fn test_login_requires_user_id() {
    let (app, _store) = test_app().await;

    let (status, json) = post_json(&app, "/login", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "VALIDATION_ERROR");

    let (status, _) = post_json(&app, "/login", json!({ "user_id": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let (app, _store) = test_app().await;

    let (status, json) = post_json(&app, "/login", json!({ "user_id": "SANGAM_MISSING0" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _store) = test_app().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
