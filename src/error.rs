//! Startup error types
//!
//! Request handling never fails with these: per-request problems become HTTP
//! statuses. Everything here is fatal and ends the process.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal server error
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("served root '{}' is not accessible: {source}", path.display())]
    Root { path: PathBuf, source: io::Error },

    #[error("served root '{}' is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("invalid content type for extension '{extension}': '{value}'")]
    MimeType { extension: String, value: String },

    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("failed to register signal handler: {0}")]
    Signal(io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_names_address() {
        let err = ServerError::Bind {
            addr: "0.0.0.0:8008".parse().unwrap(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };
        let message = err.to_string();
        assert!(message.contains("0.0.0.0:8008"));
        assert!(message.contains("address in use"));
    }
}
