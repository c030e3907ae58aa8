// Server module entry point
// Binds the listener, installs signal handling and runs the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;
use tokio::sync::Notify;

use crate::config::AppState;
use crate::error::ServerResult;
use crate::logger;

// Re-export commonly used items
pub use listener::create_listener;
pub use server_loop::start_server_loop;

/// Run the server: STARTING (bind) -> SERVING (accept loop) -> STOPPED.
///
/// Bind and signal registration failures are returned before anything is
/// served. Returns `Ok` once a shutdown signal has been handled.
pub async fn run(state: Arc<AppState>) -> ServerResult<()> {
    let addr = state.config.get_socket_addr()?;
    let listener = create_listener(addr)?;
    let local_addr = listener.local_addr()?;

    let shutdown = Arc::new(Notify::new());
    signal::start_signal_handler(Arc::clone(&shutdown))?;

    logger::log_serving_url(local_addr.port());
    logger::log_server_start(&local_addr, &state);

    start_server_loop(listener, state, shutdown).await;
    Ok(())
}
