//! Request routing dispatch.
//!
//! Entry point for HTTP request processing: method validation and the
//! entry-document-vs-static-file dispatch decision.

use crate::config::AppState;
use crate::handler::{inject, static_files};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub access_log: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let uri = req.uri();
    let path = uri.path();
    let is_head = *method == Method::HEAD;

    let access_log = state.config.logging.access_log;
    if access_log {
        logger::log_request(method, uri, req.version());
    }

    if let Some(resp) = check_http_method(method) {
        return Ok(resp);
    }

    let ctx = RequestContext {
        path,
        is_head,
        access_log,
    };

    let response = if is_entry_path(ctx.path, &state.entry_route) {
        inject::serve_entry(&ctx, &state).await
    } else {
        static_files::serve(&ctx, &state.config.site.root).await
    };
    Ok(response)
}

/// Check HTTP method and return a 405 for anything but GET/HEAD
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// The injection path answers the root and the entry document by name;
/// everything else is plain static serving.
fn is_entry_path(path: &str, entry_route: &str) -> bool {
    path == "/" || path == entry_route
}
