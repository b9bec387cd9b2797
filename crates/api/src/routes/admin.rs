//! Admin listing of guest responses.

use axum::{extract::State, Extension, Json};
use domain::models::RsvpListing;
use domain::services::{load_listing, LISTING_FAILED_MESSAGE};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{record_listing_load, RequestId};

/// GET /api/v1/admin/rsvps
///
/// Every stored response, newest first, with attending / not attending /
/// total counts.
pub async fn list_rsvps(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<RsvpListing>, ApiError> {
    match load_listing(state.data_service.as_ref()).await {
        Ok(listing) => {
            record_listing_load(true);
            tracing::debug!(total = listing.stats.total, "Loaded RSVP listing");
            Ok(Json(listing))
        }
        Err(err) => {
            record_listing_load(false);
            tracing::error!(request_id = %request_id, error = %err, "RSVP listing failed");
            Err(ApiError::ServiceUnavailable(
                LISTING_FAILED_MESSAGE.to_string(),
            ))
        }
    }
}
