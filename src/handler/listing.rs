//! Directory listing page for directories without an index file

use percent_encoding::utf8_percent_encode;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;

use crate::error::RequestError;
use crate::handler::resolve::PATH_ENCODE_SET;

struct ListingEntry {
    name: String,
    display: String,
    href: String,
}

/// Render an HTML listing of `dir`, titled with the request path
pub async fn render_listing(dir: &Path, display_path: &str) -> Result<String, RequestError> {
    let mut read_dir = fs::read_dir(dir).await.map_err(RequestError::from_lookup)?;

    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_symlink = entry.file_type().await?.is_symlink();
        // Follows symlinks, so a link to a directory still gets a trailing slash
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());

        let href = if is_dir { format!("{name}/") } else { name.clone() };
        let display = if is_symlink {
            format!("{name}@")
        } else {
            href.clone()
        };
        entries.push(ListingEntry { name, display, href });
    }
    entries.sort_by_cached_key(|e| e.name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for entry in &entries {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            utf8_percent_encode(&entry.href, PATH_ENCODE_SET),
            escape_html(&entry.display)
        );
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");

    Ok(html)
}

/// Escape text for HTML element content and attribute values
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
