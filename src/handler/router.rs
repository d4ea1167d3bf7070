//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, header
//! extraction, error-to-status conversion and access logging.

use crate::config::AppState;
use crate::error::RequestError;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URI path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling.
///
/// Never fails: every error is answered with a status response.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    // Requests are never read past the head
    let (parts, _) = req.into_parts();
    let response = dispatch(&parts, &state).await;

    if state.access_log {
        let entry = access_entry(&parts, &response, remote_addr);
        logger::log_access(&entry, &state.access_log_format);
    }

    Ok(response)
}

async fn dispatch(req: &Parts, state: &AppState) -> Response<Full<Bytes>> {
    let method = &req.method;
    if method != Method::GET && method != Method::HEAD {
        logger::log_debug(state.debug, &format!("Unsupported method: {method}"));
        return http::build_501_response();
    }

    let ctx = RequestContext {
        path: req.uri.path(),
        query: req.uri.query(),
        is_head: method == Method::HEAD,
        if_modified_since: header_value(req, "if-modified-since"),
        if_none_match: header_value(req, "if-none-match"),
    };

    match static_files::serve_path(&ctx, state).await {
        Ok(resp) => resp,
        Err(err) => {
            log_request_error(&err, ctx.path, state.debug);
            http::build_error_response(&err, ctx.is_head)
        }
    }
}

fn log_request_error(err: &RequestError, path: &str, debug: bool) {
    match err {
        RequestError::Forbidden(detail) => {
            logger::log_warning(&format!("Path traversal attempt blocked: {path} ({detail})"));
        }
        RequestError::Internal(e) => {
            logger::log_error(&format!("Failed to read '{path}': {e}"));
        }
        RequestError::NotFound | RequestError::BadRequest(_) => {
            logger::log_debug(debug, &format!("{path}: {err}"));
        }
    }
}

fn header_value(req: &Parts, name: &str) -> Option<String> {
    req.headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn access_entry(
    req: &Parts,
    resp: &Response<Full<Bytes>>,
    remote_addr: SocketAddr,
) -> AccessLogEntry {
    let target = req
        .uri
        .path_and_query()
        .map_or_else(|| req.uri.path().to_string(), ToString::to_string);

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method.to_string(),
        target,
    );
    entry.http_version = version_label(req.version).to_string();
    entry.status = resp.status().as_u16();
    entry.body_bytes = resp.body().size_hint().exact().filter(|&n| n > 0);
    entry.referer = header_value(req, "referer");
    entry.user_agent = header_value(req, "user-agent");
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn state() -> (tempfile::TempDir, Arc<AppState>) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>\n").unwrap();
        let state = AppState::for_root(dir.path()).unwrap();
        (dir, Arc::new(state))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    #[tokio::test]
    async fn test_get_index() {
        let (_dir, state) = state();
        let resp = handle_request(request(Method::GET, "/"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.len(), 12);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let (_dir, state) = state();
        let resp = handle_request(request(Method::POST, "/"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_errors_become_statuses() {
        let (_dir, state) = state();
        let resp = handle_request(
            request(Method::GET, "/missing.txt"),
            Arc::clone(&state),
            peer(),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = handle_request(
            request(Method::GET, "/../../etc/passwd"),
            Arc::clone(&state),
            peer(),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = handle_request(request(Method::GET, "/%ff"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_head_error_has_no_body() {
        let (_dir, state) = state();
        let resp = handle_request(request(Method::HEAD, "/missing.txt"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["Content-Length"], "13");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .uri("/a/b.txt?x=1")
            .header("user-agent", "curl/8.0")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let resp =
            http::build_file_response(Bytes::from_static(b"hello"), "text/plain", None, false);

        let entry = access_entry(&req, &resp, peer());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.target, "/a/b.txt?x=1");
        assert_eq!(entry.status, 200);
        assert_eq!(entry.body_bytes, Some(5));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
    }
}
