// Application state module
// Read-only values shared by every connection

use std::io;
use std::path::{Path, PathBuf};

use super::types::{Config, HttpConfig};
use crate::error::StartupError;

/// Application state
///
/// Built once at startup and handed to the server behind an `Arc`; nothing in
/// it changes while serving.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Canonical root directory
    pub root: PathBuf,
    pub http: HttpConfig,
    pub access_log: bool,
    pub access_log_format: String,
    pub debug: bool,
}

impl AppState {
    /// Validate the configured root directory and capture the serving settings
    pub fn new(config: &Config) -> Result<Self, StartupError> {
        let root = check_root_directory(&config.server.root_directory)?;
        Ok(Self {
            root,
            http: config.http.clone(),
            access_log: config.logging.access_log,
            access_log_format: config.logging.access_log_format.clone(),
            debug: config.logging.is_debug(),
        })
    }

    /// State serving `root` with default HTTP and logging settings
    pub fn for_root(root: &Path) -> Result<Self, StartupError> {
        Ok(Self {
            root: check_root_directory(root)?,
            http: HttpConfig::default(),
            access_log: false,
            access_log_format: "common".to_string(),
            debug: false,
        })
    }
}

/// Root must exist, be a directory, and be listable
fn check_root_directory(path: &Path) -> Result<PathBuf, StartupError> {
    let wrap = |source: io::Error| StartupError::RootDirectory {
        path: path.to_path_buf(),
        source,
    };

    let canonical = path.canonicalize().map_err(wrap)?;
    if !canonical.is_dir() {
        return Err(wrap(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }
    std::fs::read_dir(&canonical).map_err(wrap)?;
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("site")).unwrap();
        let dotted = dir.path().join("site").join(".");

        let state = AppState::for_root(&dotted).unwrap();
        assert_eq!(state.root, dir.path().join("site").canonicalize().unwrap());
    }

    #[test]
    fn test_missing_root_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppState::for_root(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, StartupError::RootDirectory { .. }));
    }

    #[test]
    fn test_file_root_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "x").unwrap();
        let err = AppState::for_root(&file).unwrap_err();
        assert!(matches!(err, StartupError::RootDirectory { .. }));
    }
}
