//! RSVP submission sequencing: validate, check the PIN, insert.

use std::sync::Arc;

use chrono::Utc;
use shared::crypto::redact_pin;
use thiserror::Error;
use tracing::{error, info};

use super::data_service::{DataServiceError, RsvpDataService};
use super::pin_verifier::PinVerifier;
use crate::models::form::ATTENDANCE_REQUIRED_MESSAGE;
use crate::models::{FieldErrors, FormField, NewRsvp, RsvpForm};

/// Shown on the PIN field when the code is not a valid invitation.
pub const PIN_REJECTED_MESSAGE: &str = "Código PIN inválido. Verifica tu invitación.";

/// Shown when the store could not be reached or refused the insert.
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "Hubo un error al procesar tu confirmación. Por favor intenta nuevamente.";

/// Why a submission did not produce a stored RSVP.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("{} field(s) failed validation", .0.len())]
    Validation(FieldErrors),

    #[error("Invalid PIN")]
    PinRejected,

    #[error("Submission failed: {0}")]
    Service(#[from] DataServiceError),

    #[error("Form already submitted")]
    AlreadySubmitted,
}

impl SubmissionError {
    /// Per-field messages to display. PIN rejection is reported on the PIN field.
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            SubmissionError::Validation(errors) => errors.clone(),
            SubmissionError::PinRejected => {
                FieldErrors::from([(FormField::Pin, PIN_REJECTED_MESSAGE.to_string())])
            }
            SubmissionError::Service(_) | SubmissionError::AlreadySubmitted => FieldErrors::new(),
        }
    }
}

/// Runs the submission flow against an injected data service.
#[derive(Clone)]
pub struct SubmissionSequencer {
    data: Arc<dyn RsvpDataService>,
    pins: PinVerifier,
}

impl std::fmt::Debug for SubmissionSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionSequencer")
            .field("backend", &self.data.backend_name())
            .field("pins", &self.pins)
            .finish()
    }
}

impl SubmissionSequencer {
    pub fn new(data: Arc<dyn RsvpDataService>, pins: PinVerifier) -> Self {
        Self { data, pins }
    }

    pub fn data_service(&self) -> &Arc<dyn RsvpDataService> {
        &self.data
    }

    pub fn pin_verifier(&self) -> &PinVerifier {
        &self.pins
    }

    /// Validates the form, checks PIN membership, then inserts exactly one row.
    ///
    /// Nothing is written unless every step before the insert succeeds.
    /// Failures are returned as-is; retrying is up to the caller.
    pub async fn submit(&self, form: &RsvpForm) -> Result<NewRsvp, SubmissionError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(SubmissionError::Validation(errors));
        }

        let is_member = self
            .pins
            .verify(&form.pin, self.data.as_ref())
            .await
            .map_err(|err| {
                error!(error = %err, "PIN lookup failed");
                err
            })?;
        if !is_member {
            info!(pin = %redact_pin(&form.pin), "RSVP rejected: unknown PIN");
            return Err(SubmissionError::PinRejected);
        }

        let rsvp = form.to_new_rsvp(Utc::now()).ok_or_else(|| {
            SubmissionError::Validation(FieldErrors::from([(
                FormField::Attending,
                ATTENDANCE_REQUIRED_MESSAGE.to_string(),
            )]))
        })?;

        self.data.insert_rsvp(&rsvp).await.map_err(|err| {
            error!(
                backend = self.data.backend_name(),
                error = %err,
                "Error submitting RSVP"
            );
            err
        })?;

        info!(
            pin = %redact_pin(&rsvp.pin_used),
            attending = rsvp.attending,
            has_message = rsvp.message.is_some(),
            "RSVP stored"
        );
        Ok(rsvp)
    }
}
