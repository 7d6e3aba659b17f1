// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Serving of the single-page application.
//!
//! Any GET outside `/api` and `/admin` that matches no route is answered
//! from the public directory: an existing file is returned as is, every
//! other path gets `index.html` so the client-side router can take over.

use std::path::Path;

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

/// Returns `true` for paths owned by the JSON endpoints.
pub fn is_backend_path(path: &str) -> bool {
    ["/api", "/admin"].iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Returns `true` if the path tries to climb out of the public directory.
pub fn is_traversal(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..")
}

/// Serves `request` from `public_dir`, falling back to `index.html`.
pub async fn serve(public_dir: &Path, request: Request) -> Response {
    let service = ServeDir::new(public_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(public_dir.join("index.html")));

    match service.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
