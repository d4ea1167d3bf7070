// Server module entry point
// Listener creation, accept loop, connection handling and shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used types
pub use listener::bind_listener;
pub use server_loop::StaticFileServer;
pub use signal::shutdown_signal;
