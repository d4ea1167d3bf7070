//! Request handler module
//!
//! Maps request paths onto files under the root directory and turns every
//! outcome, including failures, into an HTTP response.

mod listing;
pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
