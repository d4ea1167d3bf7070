//! HTTP protocol layer module
//!
//! Status responses, content types and HTTP dates, independent of the
//! filesystem lookup that decides which one to send.

pub mod date;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_301_response, build_304_response, build_501_response, build_error_response,
    build_file_response, build_html_response,
};
