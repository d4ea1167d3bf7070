// Signal handling module
//
// SIGINT (Ctrl+C) and SIGTERM stop the accept loop. In-flight connections
// are not drained.

use crate::logger;

/// Wait until the process is asked to stop; returns the signal name
#[cfg(unix)]
pub async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            return ctrl_c().await;
        }
    };

    tokio::select! {
        name = ctrl_c() => name,
        _ = sigterm.recv() => "SIGTERM",
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() -> &'static str {
    ctrl_c().await
}

async fn ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_warning(&format!("Failed to register Ctrl+C handler: {e}"));
        // Without a handler the default disposition terminates the process
        std::future::pending::<()>().await;
    }
    "SIGINT"
}
