// Configuration module entry point
// Loads the startup configuration and builds the immutable application state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::{ServerError, ServerResult};

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig};

/// Base name of the optional configuration file in the working directory
pub const CONFIG_FILE: &str = "static-serve";

impl Config {
    /// Load configuration from the default file name
    pub fn load() -> ServerResult<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional: every key has a default.
    pub fn load_from(config_path: &str) -> ServerResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8008)?
            .set_default("files.root", ".")?
            .set_default("files.directory_listing", true)?
            .set_default("http.server_name", "static-serve")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.header_read_timeout", 30)?
            .set_default("performance.shutdown_timeout", 5)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> ServerResult<SocketAddr> {
        let host = &self.server.host;
        // Bare IPv6 literals need brackets before the port
        let addr = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", self.server.port)
        } else {
            format!("{host}:{}", self.server.port)
        };
        addr.parse()
            .map_err(|source| ServerError::Address { addr, source })
    }
}
