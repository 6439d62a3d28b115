//! Embedded viewer page
//!
//! The static viewer is compiled into the binary via rust-embed so the
//! monitor ships as a single executable.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// Embedded static files from the static/ directory
#[derive(RustEmbed)]
#[folder = "static/"]
#[prefix = ""]
pub struct Assets;

/// Get a static file from the embedded assets
pub fn get_static_file(path: &str) -> Option<StaticFile> {
    let path = if path.is_empty() || path == "/" {
        "index.html"
    } else {
        path.trim_start_matches('/')
    };

    Assets::get(path).map(|content| StaticFile {
        content: content.data.into_owned(),
        mime_type: mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string(),
    })
}

/// A static file with content and MIME type
pub struct StaticFile {
    pub content: Vec<u8>,
    pub mime_type: String,
}

impl IntoResponse for StaticFile {
    fn into_response(self) -> Response {
        match Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, self.mime_type)
            .body(Body::from(self.content))
        {
            Ok(response) => response,
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// Serve the viewer index page
pub fn serve_index() -> Response {
    match get_static_file("index.html") {
        Some(file) => file.into_response(),
        None => (StatusCode::NOT_FOUND, "Viewer page not embedded").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: The viewer page is embedded and served
    #[test]
    fn test_index_is_embedded() {
        let file = get_static_file("index.html").expect("index.html should be embedded");
        assert_eq!(file.mime_type, "text/html");
        let body = String::from_utf8(file.content).unwrap();
        assert!(body.contains("net-sentry"));
    }

    // Test 2: Root and empty paths normalize to index.html
    #[test]
    fn test_root_path_serves_index() {
        assert!(get_static_file("").is_some());
        assert!(get_static_file("/").is_some());
    }

    // Test 3: Missing files return None
    #[test]
    fn test_missing_file_is_none() {
        assert!(get_static_file("definitely-does-not-exist.xyz").is_none());
    }

    // Test 4: StaticFile into_response sets status and succeeds
    #[test]
    fn test_static_file_into_response() {
        let file = StaticFile {
            content: b"Hello, World!".to_vec(),
            mime_type: "text/plain".to_string(),
        };
        let response = file.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
