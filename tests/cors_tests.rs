// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CORS and security header behavior on the full router.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/files")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_frontend_origin_allowed() {
    let (app, state, _) = common::create_test_app();
    let origin = state.config.frontend_url.clone();

    let response = app.oneshot(preflight(&origin)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        origin.as_str()
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_localhost_origin_allowed() {
    let (app, _, _) = common::create_test_app();

    let response = app.oneshot(preflight("http://127.0.0.1:3000")).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://127.0.0.1:3000"
    );
}

#[tokio::test]
async fn test_foreign_origin_not_allowed() {
    let (app, _, _) = common::create_test_app();

    let response = app.oneshot(preflight("https://evil.example")).await.unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_content_disposition_exposed() {
    let (app, state, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/files")
                .header(header::ORIGIN, state.config.frontend_url.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let exposed = response
        .headers()
        .get(header::ACCESS_CONTROL_EXPOSE_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(exposed.contains("content-disposition"));
}

#[tokio::test]
async fn test_security_headers_on_api_routes() {
    let (app, _, _) = common::create_test_app();

    let response = app.oneshot(common::get("/api/files")).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
    assert_eq!(headers.get("Cache-Control").unwrap(), "no-store");
}
