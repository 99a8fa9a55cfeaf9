//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health reports a degraded service when the database is down
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], false);
    assert_eq!(json["cached_timeline_owners"], 0);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app();
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    // A UUID string with hyphens.
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let app = common::build_test_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/projects")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-credentials")
            .unwrap(),
        "true"
    );
}

// ---------------------------------------------------------------------------
// Test: the portal origin may call the public portal endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_allows_portal_origin_and_exposes_request_id() {
    let app = common::build_test_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/portal/acme")
        .header("Origin", "https://client.trymarro.com")
        .header("Access-Control-Request-Method", "GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "https://client.trymarro.com"
    );

    let app = common::build_test_app();
    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let exposed = response
        .headers()
        .get("access-control-expose-headers")
        .expect("request id must be exposed to browsers");
    assert!(exposed.to_str().unwrap().contains("x-request-id"));
}
