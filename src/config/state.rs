// Application state module
// Immutable per-process state shared by every connection

use hyper::header::HeaderValue;
use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::{ServerError, ServerResult};
use crate::http::MimeRegistry;

/// Application state
///
/// Built once before the listener is bound and shared as `Arc<AppState>`.
/// Nothing in here changes after startup, so request handling takes no locks.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonical served root
    pub root: PathBuf,
    pub mime: MimeRegistry,
}

impl AppState {
    pub fn new(config: Config) -> ServerResult<Self> {
        let root = canonical_root(Path::new(&config.files.root))?;

        for (extension, value) in &config.mime.overrides {
            if HeaderValue::from_str(value).is_err() {
                return Err(ServerError::MimeType {
                    extension: extension.clone(),
                    value: value.clone(),
                });
            }
        }
        let mime = MimeRegistry::with_overrides(&config.mime.overrides);

        Ok(Self { config, root, mime })
    }
}

fn canonical_root(path: &Path) -> ServerResult<PathBuf> {
    let root = path.canonicalize().map_err(|source| ServerError::Root {
        path: path.to_path_buf(),
        source,
    })?;
    if !root.is_dir() {
        return Err(ServerError::RootNotDirectory(root));
    }
    Ok(root)
}
