//! MIME type detection module
//!
//! Returns the Content-Type for a file extension. Defaults come from the
//! `mime_guess` table; a small set of entries is force-set on top of it.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;

/// Content type for unknown or missing extensions
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Entries that always win over both the platform table and configuration
const FORCED_TYPES: [(&str, &str); 2] = [
    ("js", "application/javascript"),
    ("mp4", "video/mp4"),
];

/// Immutable extension to content-type registry
#[derive(Debug, Clone)]
pub struct MimeRegistry {
    overrides: HashMap<String, String>,
}

impl MimeRegistry {
    /// Registry with only the forced entries on top of the platform table
    pub fn new() -> Self {
        Self::with_overrides(&HashMap::new())
    }

    /// Registry with extra entries from configuration
    ///
    /// Keys may be given with or without the leading dot, in any case.
    pub fn with_overrides(extra: &HashMap<String, String>) -> Self {
        let mut overrides: HashMap<String, String> = extra
            .iter()
            .map(|(ext, content_type)| (normalize_extension(ext), content_type.clone()))
            .collect();

        for (ext, content_type) in FORCED_TYPES {
            overrides.insert(ext.to_string(), content_type.to_string());
        }

        Self { overrides }
    }

    /// Get Content-Type for an extension (`"mp4"`, `".mp4"` and `"MP4"` are equivalent)
    pub fn lookup(&self, extension: &str) -> &str {
        let key = normalize_extension(extension);
        if let Some(content_type) = self.overrides.get(&key) {
            return content_type;
        }
        if key.is_empty() {
            return FALLBACK_CONTENT_TYPE;
        }
        mime_guess::from_ext(&key)
            .first_raw()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
    }

    /// Get Content-Type for a file path by its extension
    pub fn lookup_path(&self, path: &Path) -> &str {
        path.extension()
            .and_then(OsStr::to_str)
            .map_or(FALLBACK_CONTENT_TYPE, |ext| self.lookup(ext))
    }
}

impl Default for MimeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}
