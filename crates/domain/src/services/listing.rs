//! Admin listing of stored responses.

use tracing::error;

use super::data_service::{DataServiceError, RsvpDataService};
use crate::models::{RsvpListing, RsvpStats};

/// Shown on the admin view when responses could not be loaded.
pub const LISTING_FAILED_MESSAGE: &str = "Error al cargar las respuestas";

/// Reads every stored response, newest first, and counts them.
pub async fn load_listing(data: &dyn RsvpDataService) -> Result<RsvpListing, DataServiceError> {
    let mut records = data.list_rsvps().await.map_err(|err| {
        error!(backend = data.backend_name(), error = %err, "Error loading RSVPs");
        err
    })?;

    // Backends order server-side; a stable sort keeps that order for ties.
    records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

    Ok(RsvpListing {
        stats: RsvpStats::from_records(&records),
        data: records,
    })
}
