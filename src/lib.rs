//! Loopback-only static file server.
//!
//! Serves the files below one root directory over HTTP/1.x. The
//! configuration is loaded once at startup and passed into the server as an
//! immutable [`config::AppState`].

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::{AppState, Config, ServerConfig};
pub use error::{ConfigError, RequestError, StartupError};
pub use server::StaticFileServer;
