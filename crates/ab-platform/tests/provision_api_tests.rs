//! Identity API Integration Tests
//!
//! Exercises the provisioning endpoint end to end through the router:
//! payload shapes, error codes, and widget bootstrap settings.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use ab_config::ManagementSettings;
use ab_platform::identity::{identity_router, IdentityState, InMemoryDirectory, ProvisionService};

fn router_with(settings: ManagementSettings) -> axum::Router {
    let directory = Arc::new(InMemoryDirectory::new());
    let state = IdentityState {
        service: Arc::new(ProvisionService::new(directory)),
        settings: Arc::new(settings),
        public_base_url: "https://host.example.com".to_string(),
    };
    let (router, _openapi) = identity_router(state).split_for_parts();
    router
}

fn post_provision(body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/provision")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn provision_with_nested_payload_succeeds() {
    let app = router_with(ManagementSettings::default());
    let payload = json!({
        "tokens": {"id_token": "t1", "access_token": "a1", "refresh_token": "r1"},
        "user": {"email": "new@example.com", "name": "New User"},
        "provider": "google",
    });

    let response = app.oneshot(post_provision(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["username"], "new@example.com");
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["redirect"], "current");
    assert!(body["uid"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn provision_with_flat_camel_case_payload_succeeds() {
    let app = router_with(ManagementSettings::default());
    let payload = json!({
        "idToken": "t1",
        "accessToken": "a1",
        "user": {"email": "camel@example.com"},
    });

    let response = app.oneshot(post_provision(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_id_token_is_a_bad_request() {
    let app = router_with(ManagementSettings::default());
    let payload = json!({
        "access_token": "a1",
        "user": {"email": "a@example.com"},
    });

    let response = app.oneshot(post_provision(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "MISSING_ID_TOKEN");
}

#[tokio::test]
async fn missing_email_is_a_bad_request() {
    let app = router_with(ManagementSettings::default());
    let payload = json!({
        "id_token": "t1",
        "user": {"name": "No Email"},
    });

    let response = app.oneshot(post_provision(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "MISSING_USER_DATA");
}

#[tokio::test]
async fn null_body_is_a_bad_request() {
    let app = router_with(ManagementSettings::default());

    let response = app.oneshot(post_provision(&Value::Null)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn creation_disabled_is_reported() {
    let mut settings = ManagementSettings::default();
    settings.auto_create_users = false;
    let app = router_with(settings);

    let payload = json!({
        "id_token": "t1",
        "user": {"email": "nobody@example.com"},
    });

    let response = app.oneshot(post_provision(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["error"], "USER_CREATION_DISABLED");
}

#[tokio::test]
async fn configured_redirect_flows_through() {
    let mut settings = ManagementSettings::default();
    settings.redirect_after_login = "<front>".to_string();
    let app = router_with(settings);

    let payload = json!({
        "id_token": "t1",
        "user": {"email": "front@example.com"},
    });

    let response = app.oneshot(post_provision(&payload)).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["redirect"], "/");
}

#[tokio::test]
async fn widget_settings_require_org_id() {
    let app = router_with(ManagementSettings::default());
    let request = Request::builder()
        .method(Method::GET)
        .uri("/widget-settings")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["error"], "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn widget_settings_expose_callback_uri() {
    let mut settings = ManagementSettings::default();
    settings.org_id = "org_123".to_string();
    let app = router_with(settings);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/widget-settings")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["orgId"], "org_123");
    assert_eq!(
        body["redirectUri"],
        "https://host.example.com/identity/callback"
    );
    assert_eq!(body["debugMode"], false);
}
