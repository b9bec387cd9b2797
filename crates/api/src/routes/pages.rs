//! Embedded guest and admin pages.
//!
//! The HTML, script and style files under `assets/site/` are compiled into the
//! binary and served from memory.

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

use crate::error::ApiError;

#[derive(Embed)]
#[folder = "assets/site/"]
struct SiteAssets;

fn serve_embedded(path: &str, cache_control: &'static str) -> Result<Response, ApiError> {
    let content = SiteAssets::get(path)
        .ok_or_else(|| ApiError::NotFound(format!("No asset at {path}")))?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, cache_control)
        .body(Body::from(content.data.into_owned()))
        .map_err(|e| ApiError::Internal(format!("Failed to build asset response: {e}")))
}

/// GET / - the invitation form.
pub async fn index() -> Response {
    serve_embedded("index.html", "no-cache").into_response()
}

/// GET /admin - the responses dashboard. Data is fetched separately with the admin key.
pub async fn admin_page() -> Response {
    serve_embedded("admin.html", "no-cache").into_response()
}

/// GET /assets/*path
pub async fn asset(Path(path): Path<String>) -> Response {
    if path.ends_with(".html") {
        return ApiError::NotFound(format!("No asset at {path}")).into_response();
    }
    serve_embedded(&path, "public, max-age=3600").into_response()
}
