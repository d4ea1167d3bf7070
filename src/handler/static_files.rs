//! Static file serving module
//!
//! Handles path lookup under the root, index files, directory listings,
//! conditional requests and response building.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::config::AppState;
use crate::error::RequestError;
use crate::handler::listing;
use crate::handler::resolve::{self, RequestPath};
use crate::handler::router::RequestContext;
use crate::http::{self, date, mime};
use crate::logger;

/// Serve the file or directory the request path resolves to
pub async fn serve_path(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, RequestError> {
    let request_path = RequestPath::parse(ctx.path)?;
    let candidate = request_path.join_under(&state.root);
    let resolved = resolve::contain(&state.root, &candidate).await?;
    logger::log_debug(
        state.debug,
        &format!("{} -> {}", ctx.path, resolved.display()),
    );

    let metadata = fs::metadata(&resolved)
        .await
        .map_err(RequestError::from_lookup)?;

    if metadata.is_file() {
        // A trailing slash names a directory
        if ctx.path.ends_with('/') {
            return Err(RequestError::NotFound);
        }
        return serve_file(ctx, &resolved, &candidate).await;
    }

    // FIFOs, sockets and device nodes are never opened
    if !metadata.is_dir() {
        return Err(RequestError::NotFound);
    }

    if !ctx.path.ends_with('/') {
        let location = request_path.redirect_location(ctx.query);
        return Ok(http::build_301_response(&location));
    }

    let index = find_index(&state.root, &resolved, &state.http.index_files).await?;
    if let Some((index, index_name)) = index {
        return serve_file(ctx, &index, &index_name).await;
    }

    if state.http.directory_listing {
        let html = listing::render_listing(&resolved, &request_path.display()).await?;
        return Ok(http::build_html_response(html, ctx.is_head));
    }

    Err(RequestError::NotFound)
}

/// First configured index file that exists as a regular file inside `dir`.
///
/// Returns the resolved path and the name it was found under.
async fn find_index(
    root: &Path,
    dir: &Path,
    index_files: &[String],
) -> Result<Option<(PathBuf, PathBuf)>, RequestError> {
    for index_file in index_files {
        let candidate = dir.join(index_file);
        let resolved = match resolve::contain(root, &candidate).await {
            Ok(p) => p,
            Err(RequestError::NotFound) => continue,
            Err(e) => return Err(e),
        };
        if fs::metadata(&resolved).await.is_ok_and(|m| m.is_file()) {
            return Ok(Some((resolved, candidate)));
        }
    }
    Ok(None)
}

/// Send a regular file.
///
/// `path` is opened; `name` (the path as requested, before symlink
/// resolution) decides the content type.
async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    name: &Path,
) -> Result<Response<Full<Bytes>>, RequestError> {
    let mut file = fs::File::open(path)
        .await
        .map_err(RequestError::from_lookup)?;

    // From here on the file exists, so every failure is an internal error
    let metadata = file.metadata().await?;
    let modified = metadata.modified().ok();
    let last_modified = modified.map(date::format_http_date);

    if let (Some(modified), Some(last_modified)) = (modified, last_modified.as_deref()) {
        if ctx.if_none_match.is_none()
            && date::not_modified_since(ctx.if_modified_since.as_deref(), modified)
        {
            return Ok(http::build_304_response(last_modified));
        }
    }

    let mut content = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
    file.read_to_end(&mut content).await?;

    let content_type = mime::get_content_type(name);
    Ok(http::build_file_response(
        Bytes::from(content),
        &content_type,
        last_modified.as_deref(),
        ctx.is_head,
    ))
}
