// * Static file serving for the bundled player front-end.

use hyper::{Body, Response, StatusCode};
use serde_json::json;
use std::path::Path;
use tracing::debug;

/// Serves a file beneath `root`, with `index.html` at the root path.
/// Traversal segments are rejected outright.
pub async fn serve_file(root: &Path, request_path: &str) -> Response<Body> {
    let relative = request_path.trim_start_matches('/');

    if relative.split('/').any(|seg| seg == ".." || seg.contains('\\')) {
        return not_found();
    }

    let relative = if relative.is_empty() {
        "index.html"
    } else {
        relative
    };

    let full_path = root.join(relative);
    match tokio::fs::read(&full_path).await {
        Ok(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", content_type(relative))
            .body(Body::from(bytes))
            .unwrap(),
        Err(e) => {
            debug!(path = %full_path.display(), error = %e, "Static file miss");
            not_found()
        }
    }
}

fn not_found() -> Response<Body> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .body(Body::from(json!({ "error": "Not found" }).to_string()))
        .unwrap()
}

fn content_type(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
