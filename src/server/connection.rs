// Connection handling module
// Serves one accepted TCP connection on its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Handle a single connection in a spawned task.
///
/// hyper drives the HTTP/1 protocol, including keep-alive and pipelined
/// requests; each request is answered by [`handler::handle_request`].
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let debug = state.debug;

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
        );

        if let Err(err) = conn.await {
            // Clients dropping a kept-alive connection mid-request is routine
            if err.is_incomplete_message() {
                logger::log_debug(debug, &format!("{peer_addr}: {err}"));
            } else {
                logger::log_connection_error(&err);
            }
        }
    });
}
