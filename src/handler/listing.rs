//! Directory listing module
//!
//! Generates a plain HTML index for directories without an index file.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Write;
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters left as-is in hrefs: unreserved plus the path separator
const HREF_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Single listed entry
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

impl Entry {
    /// Symlinks get a trailing `@`, other directories a trailing `/`
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    fn link_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Render the listing page for `dir`
///
/// # Arguments
/// * `dir` - Directory to list
/// * `display_path` - Decoded request path, shown in the title
pub async fn render(dir: &Path, display_path: &str) -> io::Result<String> {
    let entries = read_entries(dir).await?;
    Ok(render_html(display_path, &entries))
}

async fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        // file_type() does not follow symlinks; metadata() does
        let is_dir = if file_type.is_symlink() {
            fs::metadata(entry.path())
                .await
                .is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink: file_type.is_symlink(),
        });
    }

    entries.sort_by_key(|e| e.name.to_lowercase());
    Ok(entries)
}

fn render_html(display_path: &str, entries: &[Entry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));

    let mut html = String::new();
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{title}</h1>");
    html.push_str("<hr>\n<ul>\n");

    for entry in entries {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            utf8_percent_encode(&entry.link_name(), HREF_ENCODE_SET),
            escape_html(&entry.display_name()),
        );
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

/// Escape text for HTML element content and attribute values
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempRoot;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> Entry {
        Entry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_html() {
        let entries = vec![
            entry("clips", true, false),
            entry("my video.mp4", false, false),
            entry("latest", false, true),
            entry("<b>.txt", false, false),
        ];
        let html = render_html("/media/", &entries);

        assert!(html.contains("<title>Directory listing for /media/</title>"));
        assert!(html.contains("<h1>Directory listing for /media/</h1>"));
        assert!(html.contains("<li><a href=\"clips/\">clips/</a></li>"));
        assert!(html.contains("<li><a href=\"my%20video.mp4\">my video.mp4</a></li>"));
        assert!(html.contains("<li><a href=\"latest\">latest@</a></li>"));
        assert!(html.contains("<li><a href=\"%3Cb%3E.txt\">&lt;b&gt;.txt</a></li>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = render_html("/<script>/", &[]);
        assert!(html.contains("Directory listing for /&lt;script&gt;/"));
        assert!(!html.contains("<script>"));
    }

    #[tokio::test]
    async fn test_entries_sorted_case_insensitively() {
        let tmp = TempRoot::new("listing-sort");
        tmp.write("b.js", b"");
        tmp.write("A.mp4", b"");
        tmp.mkdir("c");

        let entries = read_entries(tmp.path()).await.unwrap();
        let names: Vec<String> = entries.iter().map(Entry::display_name).collect();
        assert_eq!(names, vec!["A.mp4", "b.js", "c/"]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let tmp = TempRoot::new("listing-missing");
        assert!(render(&tmp.path().join("nope"), "/nope/").await.is_err());
    }
}
