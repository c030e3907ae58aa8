//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! request handler: content types, path resolution, date validation and
//! response builders.

pub mod cache;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used types
pub use mime::MimeRegistry;
pub use response::{empty_body, file_body, ResponseBody};
pub use response::{
    build_304_response, build_404_response, build_501_response, build_directory_redirect,
    build_file_response, build_html_response,
};
