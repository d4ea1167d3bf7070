// Server loop module
// Binds the listener and runs the accept loop

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use super::listener::bind_listener;
use crate::config::{AppState, Config};
use crate::error::StartupError;
use crate::logger;

/// Static file server bound to its listening address
pub struct StaticFileServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: Arc<AppState>,
}

impl StaticFileServer {
    /// Validate the root directory, then bind the configured address
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let addr = config.server.socket_addr()?;
        let state = AppState::new(config)?;
        Self::bind(addr, state)
    }

    /// Bind `addr` and serve from an already validated state.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(addr: SocketAddr, state: AppState) -> Result<Self, StartupError> {
        let listener = bind_listener(addr)?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| StartupError::Bind { addr, source })?;
        Ok(Self {
            listener,
            local_addr,
            state: Arc::new(state),
        })
    }

    /// Address actually bound; differs from the requested one for port 0
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until the process is killed
    pub async fn run(self) {
        self.run_until(std::future::pending()).await;
    }

    /// Accept connections until `shutdown` completes.
    ///
    /// Accept errors are logged and never end the loop. Connections already
    /// handed to their tasks keep running after this returns.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            logger::log_debug(
                                self.state.debug,
                                &format!("Accepted connection from {peer_addr}"),
                            );
                            handle_connection(stream, peer_addr, Arc::clone(&self.state));
                        }
                        Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                    }
                }

                () = &mut shutdown => break,
            }
        }
    }
}
