use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;

#[cfg(test)]
mod test_support;

use error::ServerResult;

/// Time blocking file reads get to finish once the accept loop has stopped
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_fatal(&e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> ServerResult<()> {
    let cfg = config::Config::load()?;
    logger::init(&cfg.logging)?;

    // Built before the runtime so a bad root never reaches the bind step
    let state = Arc::new(config::AppState::new(cfg)?);

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    match state.config.server.workers {
        Some(0) => logger::log_warning("server.workers = 0 ignored, using CPU core count"),
        Some(workers) => {
            runtime_builder.worker_threads(workers);
        }
        None => {}
    }

    let runtime = runtime_builder.build()?;
    let result = runtime.block_on(server::run(state));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
    result
}
