//! Access log format module
//!
//! - `common` (Common Log Format - CLF)
//! - `combined` (CLF plus referer and user agent)

use chrono::Local;
use std::net::SocketAddr;

/// One served request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub peer: SocketAddr,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    /// Request target as sent, including any query string
    pub target: String,
    /// HTTP version (1.0, 1.1)
    pub http_version: &'static str,
    pub status: u16,
    /// Content-Length of the response, `None` when absent
    pub body_bytes: Option<u64>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
}

impl AccessLogEntry {
    pub fn new(peer: SocketAddr, method: String, target: String) -> Self {
        Self {
            peer,
            time: Local::now(),
            method,
            target,
            http_version: "1.1",
            status: 200,
            body_bytes: None,
            referer: None,
            user_agent: None,
        }
    }

    /// Format the entry; unknown format names fall back to `common`
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            _ => self.format_common(),
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        let bytes = self
            .body_bytes
            .map_or_else(|| "-".to_string(), |b| b.to_string());
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.peer.ip(),
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.target,
            self.http_version,
            self.status,
            bytes,
        )
    }
}
