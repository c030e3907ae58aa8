//! Request path resolution module
//!
//! Maps a raw request path onto the served root. Parent references are
//! resolved lexically and can never climb above the root.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Request path mapped onto the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Location under the served root
    pub fs_path: PathBuf,
    /// Decoded request path, used for display
    pub decoded: String,
    /// Whether the request path ended with `/`
    pub trailing_slash: bool,
}

/// Resolve a raw (still percent-encoded) request path against `root`
///
/// Returns `None` when the path cannot name a file: invalid UTF-8 after
/// decoding, or a segment containing a backslash or NUL byte.
pub fn resolve(root: &Path, raw_path: &str) -> Option<ResolvedPath> {
    let raw_path = raw_path.split('#').next().unwrap_or_default();
    let decoded = percent_decode_str(raw_path).decode_utf8().ok()?;
    let trailing_slash = decoded.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains(['\\', '\0']) => return None,
            s => segments.push(s),
        }
    }

    let fs_path = segments
        .iter()
        .fold(root.to_path_buf(), |path, segment| path.join(segment));

    Some(ResolvedPath {
        fs_path,
        decoded: decoded.into_owned(),
        trailing_slash,
    })
}

/// Check that an existing path, after following symlinks, stays inside `root`
///
/// `root` must already be canonical.
pub async fn is_within_root(root: &Path, path: &Path) -> bool {
    tokio::fs::canonicalize(path)
        .await
        .is_ok_and(|canonical| canonical.starts_with(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fs_path(raw: &str) -> PathBuf {
        resolve(Path::new("/srv"), raw).unwrap().fs_path
    }

    #[test]
    fn test_plain_paths() {
        assert_eq!(fs_path("/"), PathBuf::from("/srv"));
        assert_eq!(fs_path("/video.mp4"), PathBuf::from("/srv/video.mp4"));
        assert_eq!(fs_path("////static//js/index.js"), PathBuf::from("/srv/static/js/index.js"));
        assert_eq!(fs_path("/./a/./b"), PathBuf::from("/srv/a/b"));
    }

    #[test]
    fn test_traversal_is_clamped() {
        assert_eq!(fs_path("/../etc/passwd"), PathBuf::from("/srv/etc/passwd"));
        assert_eq!(fs_path("/../../../../etc/passwd"), PathBuf::from("/srv/etc/passwd"));
        assert_eq!(fs_path("/a/../../b"), PathBuf::from("/srv/b"));
        assert_eq!(fs_path("/a/b/.."), PathBuf::from("/srv/a"));
    }

    #[test]
    fn test_encoded_traversal_is_clamped() {
        assert_eq!(fs_path("/%2e%2e/%2e%2e/etc/passwd"), PathBuf::from("/srv/etc/passwd"));
        assert_eq!(fs_path("/..%2f..%2fetc%2fpasswd"), PathBuf::from("/srv/etc/passwd"));
    }

    #[test]
    fn test_percent_decoding() {
        let resolved = resolve(Path::new("/srv"), "/my%20video.mp4").unwrap();
        assert_eq!(resolved.fs_path, PathBuf::from("/srv/my video.mp4"));
        assert_eq!(resolved.decoded, "/my video.mp4");

        let resolved = resolve(Path::new("/srv"), "/caf%C3%A9/").unwrap();
        assert_eq!(resolved.fs_path, PathBuf::from("/srv/café"));
    }

    #[test]
    fn test_trailing_slash() {
        assert!(resolve(Path::new("/srv"), "/dir/").unwrap().trailing_slash);
        assert!(!resolve(Path::new("/srv"), "/dir").unwrap().trailing_slash);
        assert!(resolve(Path::new("/srv"), "/dir%2F").unwrap().trailing_slash);
    }

    #[test]
    fn test_fragment_is_dropped() {
        assert_eq!(fs_path("/index.html#top"), PathBuf::from("/srv/index.html"));
    }

    #[test]
    fn test_unresolvable() {
        assert!(resolve(Path::new("/srv"), "/%FF%FE").is_none());
        assert!(resolve(Path::new("/srv"), "/a%5C..%5Csecret").is_none());
        assert!(resolve(Path::new("/srv"), "/a%00b").is_none());
    }
}
