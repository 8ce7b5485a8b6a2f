//! Static card art.

use std::path::{Component, Path, PathBuf};

use axum::{
    body::Body,
    extract::{Path as UrlPath, State},
    http::{header, HeaderValue},
    response::Response,
    routing::get,
    Router,
};
use tracing::debug;

use crate::error::AppError;
use crate::server::AppState;

/// Asset routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/assets/*path", get(serve_asset))
}

/// Content type for the file extensions the browser knows how to display.
/// Other files are sent without one.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") => Some("image/png"),
        Some("jpg") | Some("jpeg") => Some("image/jpeg"),
        _ => None,
    }
}

/// Joins `requested` onto `root`, refusing anything that would leave it.
pub fn resolve(root: &Path, requested: &str) -> Option<PathBuf> {
    let relative = Path::new(requested);
    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if resolved == root {
        return None;
    }
    Some(resolved)
}

async fn serve_asset(
    State(state): State<AppState>,
    UrlPath(requested): UrlPath<String>,
) -> Result<Response, AppError> {
    let path = resolve(&state.config.assets_dir, &requested).ok_or(AppError::NotFound)?;
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        debug!(path = %path.display(), "Asset not served: {}", e);
        AppError::NotFound
    })?;

    let mut response = Response::new(Body::from(bytes));
    if let Some(content_type) = content_type_for(&path) {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    Ok(response)
}
