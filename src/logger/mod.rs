//! Logger module
//!
//! Provides logging utilities for the server:
//! - Server lifecycle logging
//! - Access logging
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::{AppState, LoggingConfig};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup. Unknown level names fall
/// back to `info`.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    let level = Level::parse(&config.level).unwrap_or(Level::Info);
    writer::init(
        level,
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )?;
    if Level::parse(&config.level).is_none() {
        log_warning(&format!(
            "Unknown log level '{}', using 'info'",
            config.level
        ));
    }
    Ok(())
}

fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if matches!(level, Level::Error | Level::Warn) => eprintln!("{message}"),
        None => println!("{message}"),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// The one line users look for; always on stdout regardless of log targets
pub fn log_serving_url(port: u16) {
    println!("{}", serving_url(port));
}

fn serving_url(port: u16) -> String {
    format!("Serving at http://localhost:{port}")
}

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    let config = &state.config;
    write(Level::Info, &format!("[INFO] Listening on: {addr}"));
    write(
        Level::Info,
        &format!("[INFO] Served root: {}", state.root.display()),
    );
    write(
        Level::Debug,
        &format!(
            "[DEBUG] Index files: {:?}, directory listing: {}",
            config.files.index_files, config.files.directory_listing
        ),
    );
    if let Some(workers) = config.server.workers {
        write(Level::Info, &format!("[INFO] Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write(Level::Info, &format!("[INFO] Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write(Level::Info, &format!("[INFO] Error log: {path}"));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write(
        Level::Debug,
        &format!("[DEBUG] Connection accepted from: {peer_addr}"),
    );
}

pub fn log_connection_error(peer_addr: &SocketAddr, err: &hyper::Error) {
    // Clients hanging up mid-response is routine for media streaming
    let level = if err.is_incomplete_message() || err.is_canceled() {
        Level::Debug
    } else {
        Level::Warn
    };
    let tag = if level == Level::Debug { "[DEBUG]" } else { "[WARN]" };
    write(level, &format!("{tag} Connection {peer_addr} ended: {err}"));
}

pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write(Level::Info, &format!("[INFO] {message}"));
}

pub fn log_shutdown_requested(signal: &str) {
    log_info(&format!("{signal} received, shutting down"));
}

pub fn log_shutdown_complete(unfinished: usize) {
    if unfinished == 0 {
        log_info("Server stopped");
    } else {
        log_warning(&format!(
            "Server stopped with {unfinished} connection(s) still open"
        ));
    }
}

/// Startup failures bypass the writer: it may be the thing that failed
pub fn log_fatal(err: &impl std::fmt::Display) {
    eprintln!("[FATAL] {err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serving_url_line() {
        assert_eq!(serving_url(8008), "Serving at http://localhost:8008");
        assert_eq!(serving_url(0), "Serving at http://localhost:0");
    }
}
