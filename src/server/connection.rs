// Connection handling module
// Serves HTTP/1.x on a single accepted TCP connection

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Keeps the active connection count accurate even if the task is dropped
struct ActiveConnection(Arc<AtomicUsize>);

impl ActiveConnection {
    fn register(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for ActiveConnection {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Accept a connection and serve it on its own task.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    let guard = ActiveConnection::register(conn_counter);
    logger::log_connection_accepted(&peer_addr);

    let state = Arc::clone(state);
    tokio::spawn(async move {
        let _guard = guard;
        serve_connection(stream, peer_addr, state).await;
    });
}

/// Serve one or more requests on the connection until either side closes it.
///
/// A client hanging up mid-transfer ends only this connection.
async fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    let io = TokioIo::new(stream);

    let keep_alive = state.config.performance.keep_alive;
    let header_read_timeout = state.config.performance.header_read_timeout;

    let mut builder = http1::Builder::new();
    builder.timer(TokioTimer::new()).keep_alive(keep_alive);
    if header_read_timeout > 0 {
        builder.header_read_timeout(Duration::from_secs(header_read_timeout));
    }

    let service = service_fn(move |req: Request<Incoming>| {
        handler::handle_request(req, Arc::clone(&state), peer_addr)
    });

    if let Err(err) = builder.serve_connection(io, service).await {
        logger::log_connection_error(&peer_addr, &err);
    }
}
