//! Error types
//!
//! Startup failures are fatal and end the process; request failures are
//! turned into HTTP status responses by the handler.

use hyper::StatusCode;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal error raised before the serve loop starts
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("root directory '{}' is not usable: {source}", .path.display())]
    RootDirectory { path: PathBuf, source: io::Error },

    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("failed to open log file: {0}")]
    Logger(io::Error),

    #[error("failed to start runtime: {0}")]
    Runtime(io::Error),
}

/// Configuration loading or validation failure
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("invalid address '{value}': {source}")]
    Address {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("{0} is not a loopback address")]
    NotLoopback(SocketAddr),
}

/// Per-request failure, always answered with a status code
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("not found")]
    NotFound,

    #[error("path escapes root directory: {0}")]
    Forbidden(String),

    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error("i/o error: {0}")]
    Internal(#[from] io::Error),
}

impl RequestError {
    /// Status code sent to the client for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify an error from a lookup that happens before the file is open.
    ///
    /// Missing or unreadable paths are reported as not found; anything else
    /// is an internal error.
    pub fn from_lookup(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound
            | io::ErrorKind::PermissionDenied
            | io::ErrorKind::NotADirectory => Self::NotFound,
            _ => Self::Internal(err),
        }
    }
}
