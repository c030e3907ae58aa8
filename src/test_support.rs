//! Shared fixtures for unit tests

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::{AppState, Config};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Throwaway served root under the system temp directory, removed on drop
pub struct TempRoot {
    path: PathBuf,
}

impl TempRoot {
    pub fn new(label: &str) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "static-serve-{label}-{}-{id}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let target = self.path.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&target, contents).unwrap();
        target
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let target = self.path.join(relative);
        fs::create_dir_all(&target).unwrap();
        target
    }
}

impl Drop for TempRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Default configuration pointed at `root`, with access logging off
pub fn test_config(root: &Path) -> Config {
    let mut cfg = Config::load_from("does-not-exist/static-serve").unwrap();
    cfg.files.root = root.display().to_string();
    cfg.logging.access_log = false;
    cfg
}

pub fn test_state(root: &Path) -> Arc<AppState> {
    Arc::new(AppState::new(test_config(root)).unwrap())
}
