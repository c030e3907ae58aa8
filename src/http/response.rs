//! HTTP response building module
//!
//! Provides builders for the responses a static file server sends.

use futures::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
use hyper::{Response, StatusCode};
use std::io;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// Body type of every response: in-memory bytes or a file streamed in chunks
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// Body holding bytes already in memory
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new().map_err(|never| match never {}).boxed_unsync()
}

/// Body reading `file` in chunks as the client consumes it
///
/// A read error mid-transfer ends the connection; nothing is buffered whole.
pub fn file_body(file: File) -> ResponseBody {
    StreamBody::new(ReaderStream::new(file).map_ok(Frame::data)).boxed_unsync()
}

/// Build 200 response for a file
///
/// `content_length` is the size of the file even when `body` is empty for
/// a HEAD request.
pub fn build_file_response(
    body: ResponseBody,
    content_type: &str,
    content_length: u64,
    last_modified: Option<&str>,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length);

    if let Some(date) = last_modified {
        builder = builder.header(LAST_MODIFIED, date);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(empty_body())
    })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head {
        empty_body()
    } else {
        full_body(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(empty_body())
        })
}

/// Build 301 redirect to the slash-terminated form of a directory path
pub fn build_directory_redirect(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_LENGTH, 0)
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(empty_body())
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: Option<&str>) -> Response<ResponseBody> {
    let mut builder = Response::builder().status(StatusCode::NOT_MODIFIED);
    if let Some(date) = last_modified {
        builder = builder.header(LAST_MODIFIED, date);
    }

    builder.body(empty_body()).unwrap_or_else(|e| {
        log_build_error("304", &e);
        Response::new(empty_body())
    })
}

/// Build 404 Not Found response
pub fn build_404_response(is_head: bool) -> Response<ResponseBody> {
    build_plain_error(StatusCode::NOT_FOUND, "404 Not Found", is_head)
}

/// Build 501 Not Implemented response for unsupported methods
pub fn build_501_response() -> Response<ResponseBody> {
    build_plain_error(StatusCode::NOT_IMPLEMENTED, "501 Not Implemented", false)
}

fn build_plain_error(status: StatusCode, message: &'static str, is_head: bool) -> Response<ResponseBody> {
    let body = if is_head {
        empty_body()
    } else {
        full_body(Bytes::from_static(message.as_bytes()))
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, message.len())
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut response = Response::new(full_body(Bytes::from_static(message.as_bytes())));
            *response.status_mut() = status;
            response
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_response_headers() {
        let response = build_file_response(
            full_body(Bytes::from_static(b"console.log(1);")),
            "application/javascript",
            15,
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
        );
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/javascript");
        assert_eq!(response.headers()[CONTENT_LENGTH], "15");
        assert_eq!(
            response.headers()[LAST_MODIFIED],
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
    }

    #[test]
    fn test_head_html_keeps_length() {
        let response = build_html_response("<p>hi</p>".to_string(), true);
        assert_eq!(response.headers()[CONTENT_LENGTH], "9");
    }

    #[test]
    fn test_error_responses() {
        assert_eq!(build_404_response(false).status(), StatusCode::NOT_FOUND);
        assert_eq!(build_501_response().status(), StatusCode::NOT_IMPLEMENTED);

        let redirect = build_directory_redirect("/media/");
        assert_eq!(redirect.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(redirect.headers()[LOCATION], "/media/");
    }

    #[tokio::test]
    async fn test_file_body_streams_whole_file() {
        let tmp = crate::test_support::TempRoot::new("response-stream");
        let data: Vec<u8> = (0..=255u8).cycle().take(200_000).collect();
        tmp.write("big.bin", &data);

        let file = File::open(tmp.path().join("big.bin")).await.unwrap();
        let body = file_body(file).collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), data.as_slice());
    }

    #[tokio::test]
    async fn test_head_bodies_are_empty() {
        let body = build_404_response(true).into_body();
        assert!(body.collect().await.unwrap().to_bytes().is_empty());
    }
}
