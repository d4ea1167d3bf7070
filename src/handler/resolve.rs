//! Request path resolution
//!
//! Maps a URI path onto the filesystem under the root directory. Resolution
//! is done in two steps: a lexical pass that applies `.` and `..` without
//! touching the disk, and a canonicalization pass that catches symlinks
//! pointing outside the root.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::{Path, PathBuf};

use crate::error::RequestError;

/// Characters left as-is when a path is written back into a URL
pub(crate) const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// A decoded request path with `.` and `..` already applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    segments: Vec<String>,
    trailing_slash: bool,
}

impl RequestPath {
    /// Decode and normalize the path component of a request URI
    pub fn parse(raw_path: &str) -> Result<Self, RequestError> {
        let decoded = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|_| RequestError::BadRequest("path is not valid UTF-8"))?;
        if decoded.contains('\0') {
            return Err(RequestError::BadRequest("path contains a NUL byte"));
        }

        let mut segments: Vec<String> = Vec::new();
        for segment in decoded.split(is_separator) {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(RequestError::Forbidden(raw_path.to_string()));
                    }
                }
                name => segments.push(name.to_string()),
            }
        }

        Ok(Self {
            segments,
            trailing_slash: decoded.ends_with('/'),
        })
    }

    /// Path below `root` this request refers to, before symlink resolution
    pub fn join_under(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(&self.segments);
        path
    }

    /// Normalized path as shown to users, e.g. `/a/b/`
    pub fn display(&self) -> String {
        let mut shown = String::from("/");
        shown.push_str(&self.segments.join("/"));
        if self.trailing_slash && !self.segments.is_empty() {
            shown.push('/');
        }
        shown
    }

    /// `Location` for the slash-terminated form of this path.
    ///
    /// Built from the normalized segments, so the result always starts with
    /// exactly one `/` and can never name another host.
    pub fn redirect_location(&self, query: Option<&str>) -> String {
        let mut path = String::from("/");
        for segment in &self.segments {
            path.push_str(segment);
            path.push('/');
        }
        let mut location = utf8_percent_encode(&path, PATH_ENCODE_SET).to_string();
        if let Some(query) = query {
            location.push('?');
            location.push_str(query);
        }
        location
    }
}

#[cfg(windows)]
const fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

#[cfg(not(windows))]
const fn is_separator(c: char) -> bool {
    c == '/'
}

/// Resolve symlinks in `candidate` and require the result to stay inside `root`.
///
/// `root` must already be canonical.
pub async fn contain(root: &Path, candidate: &Path) -> Result<PathBuf, RequestError> {
    let resolved = tokio::fs::canonicalize(candidate)
        .await
        .map_err(RequestError::from_lookup)?;
    if !resolved.starts_with(root) {
        return Err(RequestError::Forbidden(format!(
            "{} -> {}",
            candidate.display(),
            resolved.display()
        )));
    }
    Ok(resolved)
}
