// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router tests driven through `tower::ServiceExt::oneshot`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod fallback_tests;

use super::*;
use axum::body::Body;
use axum::http::{
    self, HeaderValue,
    header::{CONTENT_TYPE, COOKIE},
};
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin123";

/// A fully decoded response.
struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

/// Helper to create test app state with in-memory persistence and a
/// seeded admin. The public directory does not exist.
fn create_test_app_state() -> AppState {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    persistence
        .ensure_default_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .expect("Failed to seed admin");
    AppState::new(
        persistence,
        std::env::temp_dir().join("stepcount-missing-public"),
    )
}

fn create_test_app() -> Router {
    build_router(create_test_app_state())
}

/// Builds a request with an optional JSON body and session cookie.
fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<&Value>) -> http::Request<Body> {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends a request and decodes the JSON body (`Null` when empty or not JSON).
async fn send(app: &Router, request: http::Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let headers: HeaderMap = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Logs in with the seeded admin and returns the `Cookie` header value.
async fn login_cookie(app: &Router) -> String {
    let response: TestResponse = send(
        app,
        request(
            "POST",
            "/admin/login",
            None,
            Some(&json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    set_cookie(&response)
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn set_cookie(response: &TestResponse) -> &str {
    response
        .headers
        .get(SET_COOKIE)
        .map(HeaderValue::to_str)
        .unwrap()
        .unwrap()
}

/// Creates an employee and a location through the admin API.
async fn seed_catalog(app: &Router, cookie: &str) -> (i64, i64) {
    let employee: TestResponse = send(
        app,
        request(
            "POST",
            "/admin/employees",
            Some(cookie),
            Some(&json!({"name": "Kari"})),
        ),
    )
    .await;
    let location: TestResponse = send(
        app,
        request(
            "POST",
            "/admin/locations",
            Some(cookie),
            Some(&json!({"name": "Oslo"})),
        ),
    )
    .await;

    (
        employee.body["id"].as_i64().unwrap(),
        location.body["id"].as_i64().unwrap(),
    )
}
