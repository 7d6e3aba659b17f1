// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::*;

const INDEX_HTML: &str = "<!doctype html><title>Step Count</title>";

/// Creates a public directory holding `index.html` and `app.css`.
fn create_public_dir() -> PathBuf {
    let dir: PathBuf =
        std::env::temp_dir().join(format!("stepcount-public-{}", rand::random::<u64>()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(dir.join("app.css"), "body { margin: 0; }").unwrap();
    dir
}

fn create_app_with_public_dir() -> Router {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    build_router(AppState::new(persistence, create_public_dir()))
}

async fn body_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(request("GET", uri, None, None))
        .await
        .unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[test]
fn test_backend_paths() {
    assert!(spa::is_backend_path("/api"));
    assert!(spa::is_backend_path("/api/unknown"));
    assert!(spa::is_backend_path("/admin/"));
    assert!(!spa::is_backend_path("/apiary"));
    assert!(!spa::is_backend_path("/administration"));
    assert!(!spa::is_backend_path("/"));
}

#[test]
fn test_traversal_paths() {
    assert!(spa::is_traversal("/../etc/passwd"));
    assert!(spa::is_traversal("/assets/..\\secret"));
    assert!(!spa::is_traversal("/assets/app..css"));
}

#[tokio::test]
async fn test_unknown_page_serves_index() {
    let app: Router = create_app_with_public_dir();

    let (status, body) = body_text(&app, "/leaderboard/weekly").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INDEX_HTML);
}

#[tokio::test]
async fn test_existing_static_file_is_served() {
    let app: Router = create_app_with_public_dir();

    let (status, body) = body_text(&app, "/app.css").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "body { margin: 0; }");
}

#[tokio::test]
async fn test_unknown_api_path_is_json_not_found() {
    let app: Router = create_app_with_public_dir();

    for uri in ["/api/unknown", "/admin/nothing/here"] {
        let response: TestResponse = send(&app, request("GET", uri, None, None)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, json!({"error": "Not found"}));
    }
}

#[tokio::test]
async fn test_unmatched_non_get_is_not_found() {
    let app: Router = create_app_with_public_dir();

    let response: TestResponse = send(&app, request("POST", "/leaderboard", None, None)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({"error": "Not found"}));
}

#[tokio::test]
async fn test_wrong_method_on_known_route_is_json_not_found() {
    let app: Router = create_test_app();
    let cookie: String = login_cookie(&app).await;

    for (method, uri) in [
        ("GET", "/api/steps"),
        ("DELETE", "/api/employees"),
        ("GET", "/admin/employees/1"),
        ("PATCH", "/admin/steps/1"),
    ] {
        let response: TestResponse = send(&app, request(method, uri, Some(&cookie), None)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(response.body, json!({"error": "Not found"}));
    }
}

#[tokio::test]
async fn test_traversal_is_not_found() {
    let app: Router = create_app_with_public_dir();

    let response: TestResponse = send(&app, request("GET", "/../Cargo.toml", None, None)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
