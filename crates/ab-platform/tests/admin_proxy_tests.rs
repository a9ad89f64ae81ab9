//! Management Proxy API Integration Tests
//!
//! Exercises the admin endpoints end to end through the router against a
//! mock remote API: pass-through on success, error mapping on failure.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ab_config::ManagementSettings;
use ab_platform::management::{admin_router, AdminState, ManagementApiClient};

fn router_for(server: &MockServer) -> axum::Router {
    let mut settings = ManagementSettings::default();
    settings.api_key = "test-key".to_string();
    settings.api_base_url = server.uri();

    let state = AdminState {
        client: Arc::new(ManagementApiClient::new(&settings)),
    };
    let (router, _openapi) = admin_router(state).split_for_parts();
    router
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn organization_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "org_123"})))
        .mount(&server)
        .await;

    let response = router_for(&server)
        .oneshot(get("/organization"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], "org_123");
}

#[tokio::test]
async fn remote_failure_maps_to_bad_gateway() {
    // No mocks mounted: every remote call 404s.
    let server = MockServer::start().await;

    let response = router_for(&server).oneshot(get("/providers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(json_body(response).await["error"], "REMOTE_API_ERROR");
}

#[tokio::test]
async fn remote_failure_reports_the_concrete_resource_path() {
    let server = MockServer::start().await;

    let response = router_for(&server)
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/providers/prov_9")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // The error must name the resource that failed, id included.
    let body = json_body(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("/providers/prov_9"));

    let response = router_for(&server)
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/webhooks/wh_3")
                .header("content-type", "application/json")
                .body(Body::from(json!({"url": "https://x"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("/webhooks/wh_3"));
}

#[tokio::test]
async fn missing_key_is_reported_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/providers"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut settings = ManagementSettings::default();
    settings.api_base_url = server.uri();
    let state = AdminState {
        client: Arc::new(ManagementApiClient::new(&settings)),
    };
    let (router, _openapi) = admin_router(state).split_for_parts();

    let response = router.oneshot(get("/providers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "API_KEY_MISSING");
}

#[tokio::test]
async fn connection_check_never_errors() {
    let server = MockServer::start().await;

    let response = router_for(&server).oneshot(get("/connection")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["connected"], false);
}
