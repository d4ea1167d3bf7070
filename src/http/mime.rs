//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

use std::path::Path;

/// Get MIME Content-Type for a file path
///
/// HTML and plain text are labelled UTF-8; unknown extensions fall back to
/// `application/octet-stream`.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use static_serve::http::mime::get_content_type;
/// assert_eq!(get_content_type(Path::new("index.html")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(Path::new("movie.mp4")), "video/mp4");
/// assert_eq!(get_content_type(Path::new("README")), "application/octet-stream");
/// ```
pub fn get_content_type(path: &Path) -> String {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    match mime.essence_str() {
        essence @ ("text/html" | "text/plain") => format!("{essence}; charset=utf-8"),
        essence => essence.to_string(),
    }
}
