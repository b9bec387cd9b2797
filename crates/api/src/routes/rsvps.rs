//! Guest RSVP submission endpoint.

use axum::{extract::State, http::StatusCode, Extension, Json};
use domain::models::{FormField, NewRsvp};
use domain::services::RsvpFormController;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{record_submission, submission_outcome, RequestId};

/// Body posted by the guest form. Missing fields count as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitRsvpRequest {
    pub pin: String,
    pub name: String,
    /// `"yes"` or `"no"`; anything else is treated as not chosen.
    pub attending: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitRsvpResponse {
    pub status: &'static str,
    /// Tells the page to play the confetti animation.
    pub celebrate: bool,
    pub rsvp: NewRsvp,
}

/// POST /api/v1/rsvps
///
/// Runs one guest's form through validation, PIN verification and a single
/// insert. Field problems come back as 422 with per-field details; storage
/// failures as 503 with a generic message.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(request): Json<SubmitRsvpRequest>,
) -> Result<(StatusCode, Json<SubmitRsvpResponse>), ApiError> {
    let mut controller = RsvpFormController::new(state.sequencer.clone());
    controller.set_field(FormField::Pin, request.pin);
    controller.set_field(FormField::Name, request.name);
    controller.set_field(FormField::Attending, request.attending.unwrap_or_default());
    controller.set_field(FormField::Message, request.message.unwrap_or_default());

    let result = controller.submit().await;
    let outcome = submission_outcome(&result.as_ref().map(|_| ()));
    record_submission(outcome);

    let rsvp = result.map_err(|err| {
        tracing::info!(request_id = %request_id, outcome, "RSVP not stored");
        ApiError::from(err)
    })?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitRsvpResponse {
            status: "submitted",
            celebrate: true,
            rsvp,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_missing_fields() {
        let request: SubmitRsvpRequest = serde_json::from_str(r#"{"pin":"2210"}"#).unwrap();
        assert_eq!(request.pin, "2210");
        assert_eq!(request.name, "");
        assert_eq!(request.attending, None);
        assert_eq!(request.message, None);
    }

    #[test]
    fn test_request_accepts_null_message() {
        let request: SubmitRsvpRequest = serde_json::from_str(
            r#"{"pin":"2210","name":"Ana","attending":"yes","message":null}"#,
        )
        .unwrap();
        assert_eq!(request.attending.as_deref(), Some("yes"));
        assert_eq!(request.message, None);
    }
}
