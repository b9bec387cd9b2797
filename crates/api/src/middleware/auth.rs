//! Admin key middleware.
//!
//! The admin listing exposes every guest's name and message, so it is gated on
//! the `X-Admin-Key` header matching `admin.api_key`.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::crypto::keys_match;

use crate::app::AppState;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Rejects the request with 401 unless the admin key header matches.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let authorized = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|key| is_authorized(key, &state.config.admin.api_key));

    match authorized {
        Some(true) => next.run(req).await,
        Some(false) => {
            tracing::warn!("Rejected admin request with wrong key");
            unauthorized_response("Invalid admin key")
        }
        None => unauthorized_response("Missing admin key"),
    }
}

/// An empty configured key never authorizes anything.
fn is_authorized(provided: &str, expected: &str) -> bool {
    !expected.is_empty() && keys_match(provided, expected)
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}
