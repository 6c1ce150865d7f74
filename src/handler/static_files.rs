//! Static file serving.
//!
//! File loading from the document root, MIME type detection, and response
//! building for every path the injection route does not intercept.

use crate::handler::router::RequestContext;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a file from the document root, or 404.
pub async fn serve(ctx: &RequestContext<'_>, root: &str) -> Response<Full<Bytes>> {
    match load_from_root(root, ctx.path).await {
        Some((content, content_type)) => {
            if ctx.access_log {
                logger::log_response(content.len());
            }
            http::response::build_file_response(content, content_type, ctx.is_head)
        }
        None => http::build_404_response(),
    }
}

/// Load a file from the document root.
///
/// Directory paths fall back to an `index.html` inside the directory. Paths
/// resolving outside the canonical root are rejected.
pub async fn load_from_root(root: &str, path: &str) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    let mut file_path = Path::new(root).join(&clean_path);

    let root_canonical = match Path::new(root).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Document root not found or inaccessible '{root}': {e}"
            ));
            return None;
        }
    };

    if file_path.is_dir() {
        file_path = file_path.join("index.html");
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn loads_files_relative_to_the_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut f = std::fs::File::create(dir.path().join("app.js")).expect("create");
        f.write_all(b"console.log(1);").expect("write");

        let root = dir.path().to_str().expect("utf8 path");
        let (content, content_type) = load_from_root(root, "/app.js").await.expect("loaded");
        assert_eq!(content, b"console.log(1);");
        assert_eq!(content_type, "application/javascript");
    }

    #[tokio::test]
    async fn missing_files_yield_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().to_str().expect("utf8 path");
        assert!(load_from_root(root, "/nope.css").await.is_none());
    }

    #[tokio::test]
    async fn directories_fall_back_to_their_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("docs")).expect("mkdir");
        std::fs::write(dir.path().join("docs/index.html"), "<p>docs</p>").expect("write");

        let root = dir.path().to_str().expect("utf8 path");
        let (content, content_type) = load_from_root(root, "/docs").await.expect("loaded");
        assert_eq!(content, b"<p>docs</p>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn traversal_components_are_stripped() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("safe.txt"), "ok").expect("write");

        let root = dir.path().to_str().expect("utf8 path");
        assert!(load_from_root(root, "/../../etc/passwd").await.is_none());
    }
}
