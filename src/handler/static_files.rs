//! Static file serving module
//!
//! Resolves request paths under the served root and builds file,
//! index, listing and redirect responses.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, path, ResponseBody};
use crate::logger;
use hyper::Response;
use std::fs::Metadata;
use std::path::Path;
use tokio::fs;

/// Serve the request path from the served root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    let Some(resolved) = path::resolve(&state.root, ctx.path) else {
        logger::log_warning(&format!("Unresolvable request path: {}", ctx.path));
        return http::build_404_response(ctx.is_head);
    };

    // File not found is common (404), no need to log at warning level
    let Ok(metadata) = fs::metadata(&resolved.fs_path).await else {
        return http::build_404_response(ctx.is_head);
    };

    if !path::is_within_root(&state.root, &resolved.fs_path).await {
        logger::log_warning(&format!(
            "Path outside served root blocked: {} -> {}",
            ctx.path,
            resolved.fs_path.display()
        ));
        return http::build_404_response(ctx.is_head);
    }

    if metadata.is_dir() {
        if !resolved.trailing_slash {
            return http::build_directory_redirect(&redirect_location(ctx));
        }
        return serve_directory(ctx, state, &resolved.fs_path, &resolved.decoded).await;
    }

    // A file named like a directory ("/app.js/") does not exist
    if resolved.trailing_slash || !metadata.is_file() {
        return http::build_404_response(ctx.is_head);
    }

    serve_file(ctx, state, &resolved.fs_path, &metadata).await
}

/// Serve an index file from the directory, or a listing of it
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
    decoded_path: &str,
) -> Response<ResponseBody> {
    for index_file in &state.config.files.index_files {
        let index_path = dir.join(index_file);
        if let Ok(metadata) = fs::metadata(&index_path).await {
            if metadata.is_file() && path::is_within_root(&state.root, &index_path).await {
                return serve_file(ctx, state, &index_path, &metadata).await;
            }
        }
    }

    if !state.config.files.directory_listing {
        return http::build_404_response(ctx.is_head);
    }

    match listing::render(dir, decoded_path).await {
        Ok(html) => http::build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_warning(&format!(
                "No permission to list directory '{}': {e}",
                dir.display()
            ));
            http::build_404_response(ctx.is_head)
        }
    }
}

/// Serve a regular file
///
/// HEAD requests are answered from metadata alone; GET streams the file.
async fn serve_file(
    ctx: &RequestContext<'_>,
    state: &AppState,
    file_path: &Path,
    metadata: &Metadata,
) -> Response<ResponseBody> {
    let content_type = state.mime.lookup_path(file_path);
    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::format_http_date);

    if cache::is_not_modified(ctx.if_modified_since, ctx.has_if_none_match, modified) {
        return http::build_304_response(last_modified.as_deref());
    }

    if ctx.is_head {
        return http::build_file_response(
            http::empty_body(),
            content_type,
            metadata.len(),
            last_modified.as_deref(),
        );
    }

    let file = match fs::File::open(file_path).await {
        Ok(f) => f,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to open file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response(false);
        }
    };

    // Length from the open handle so it matches the bytes streamed
    let content_length = file.metadata().await.map_or(metadata.len(), |m| m.len());
    http::build_file_response(
        http::file_body(file),
        content_type,
        content_length,
        last_modified.as_deref(),
    )
}

/// Slash-terminated form of the request path, query preserved
///
/// Leading slashes collapse to one: `//host` in `Location` would be read
/// as a network-path reference to another host.
fn redirect_location(ctx: &RequestContext<'_>) -> String {
    let path = ctx.path.trim_start_matches('/');
    match ctx.query {
        Some(query) => format!("/{path}/?{query}"),
        None => format!("/{path}/"),
    }
}
