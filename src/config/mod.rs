// Configuration module entry point
// Loads the startup configuration and builds the shared, read-only state

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

use crate::error::ConfigError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, ServerConfig};

/// Config file looked up in the working directory (extension resolved by `config`)
pub const DEFAULT_CONFIG_NAME: &str = "serve";

impl Config {
    /// Load configuration from `serve.toml` in the working directory, if present
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_NAME)
    }

    /// Load configuration from specified file path (without extension).
    /// A missing file leaves every value at its default.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.bind_address", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.root_directory", "tmp")?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?
            .set_default("http.directory_listing", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.server.socket_addr()?;
        Ok(cfg)
    }
}

impl ServerConfig {
    /// Parse `bind_address:port`, rejecting anything that is not loopback
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|source| ConfigError::Address {
                value: self.bind_address.clone(),
                source,
            })?;
        let addr = SocketAddr::new(ip, self.port);
        if !ip.is_loopback() {
            return Err(ConfigError::NotLoopback(addr));
        }
        Ok(addr)
    }
}
