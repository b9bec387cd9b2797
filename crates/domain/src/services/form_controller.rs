//! Interactive RSVP form controller.
//!
//! Holds the values a guest is typing, the errors currently displayed and the
//! submission state. Transitions:
//!
//! ```text
//! Idle --submit--> (validate) --invalid--> Idle with field errors
//!                             --valid----> Submitting --ok-----> Submitted
//!                                                     --error--> Idle with error
//! Submitted --reset--> Idle
//! ```

use std::sync::Arc;

use crate::models::{Attendance, FieldErrors, FormField, FormState, NewRsvp, RsvpForm};

use super::submission::{SubmissionError, SubmissionSequencer, SUBMISSION_FAILED_MESSAGE};

/// Controller for one guest's form session.
#[derive(Debug)]
pub struct RsvpFormController {
    sequencer: Arc<SubmissionSequencer>,
    form: RsvpForm,
    errors: FieldErrors,
    submission_error: Option<String>,
    state: FormState,
}

impl RsvpFormController {
    pub fn new(sequencer: Arc<SubmissionSequencer>) -> Self {
        Self {
            sequencer,
            form: RsvpForm::default(),
            errors: FieldErrors::new(),
            submission_error: None,
            state: FormState::Idle,
        }
    }

    pub fn form(&self) -> &RsvpForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.state == FormState::Submitted
    }

    /// Updates a text field and clears the error displayed on it.
    ///
    /// Attendance is not a text field; a value here is parsed as `yes`/`no`
    /// and anything else leaves it unset.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Pin => self.form.pin = value,
            FormField::Name => self.form.name = value,
            FormField::Message => self.form.message = value,
            FormField::Attending => self.form.attending = value.parse().ok(),
        }
        self.errors.remove(&field);
    }

    /// Picks an attendance option and clears its error.
    pub fn select_attendance(&mut self, attendance: Attendance) {
        self.form.attending = Some(attendance);
        self.errors.remove(&FormField::Attending);
    }

    /// Runs the submission flow.
    ///
    /// After a success further submits are refused until [`reset`](Self::reset).
    /// On failure the entered values are kept so the guest can retry.
    pub async fn submit(&mut self) -> Result<NewRsvp, SubmissionError> {
        if self.state == FormState::Submitted {
            return Err(SubmissionError::AlreadySubmitted);
        }

        self.errors.clear();
        self.submission_error = None;

        let errors = self.form.validate();
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(SubmissionError::Validation(errors));
        }

        self.state = FormState::Submitting;
        let result = self.sequencer.submit(&self.form).await;

        match &result {
            Ok(_) => self.state = FormState::Submitted,
            Err(err) => {
                self.state = FormState::Idle;
                self.errors = err.field_errors();
                if matches!(err, SubmissionError::Service(_)) {
                    self.submission_error = Some(SUBMISSION_FAILED_MESSAGE.to_string());
                }
            }
        }
        result
    }

    /// Empties the form and clears all errors and the submitted flag.
    pub fn reset(&mut self) {
        self.form = RsvpForm::default();
        self.errors.clear();
        self.submission_error = None;
        self.state = FormState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::data_service::MockDataService;
    use crate::services::pin_verifier::PinVerifier;
    use crate::services::submission::PIN_REJECTED_MESSAGE;

    fn controller(data: Arc<MockDataService>) -> RsvpFormController {
        RsvpFormController::new(Arc::new(SubmissionSequencer::new(
            data,
            PinVerifier::default(),
        )))
    }

    fn fill(controller: &mut RsvpFormController, pin: &str, name: &str) {
        controller.set_field(FormField::Pin, pin);
        controller.set_field(FormField::Name, name);
        controller.select_attendance(Attendance::Attending);
    }

    #[tokio::test]
    async fn test_successful_submission_reaches_submitted() {
        let data = Arc::new(MockDataService::new());
        let mut controller = controller(data.clone());
        fill(&mut controller, "2210", "Ana");
        controller.set_field(FormField::Message, "");

        let rsvp = controller.submit().await.unwrap();

        assert!(controller.is_submitted());
        assert!(controller.errors().is_empty());
        assert_eq!(controller.submission_error(), None);
        assert_eq!(rsvp.name, "Ana");
        assert!(rsvp.attending);
        assert_eq!(rsvp.message, None);
        assert_eq!(rsvp.pin_used, "2210");
        assert_eq!(data.insert_calls(), 1);
    }

    #[tokio::test]
    async fn test_submitted_form_blocks_resubmission() {
        let data = Arc::new(MockDataService::new());
        let mut controller = controller(data.clone());
        fill(&mut controller, "2210", "Ana");

        controller.submit().await.unwrap();
        let err = controller.submit().await.unwrap_err();

        assert_eq!(err, SubmissionError::AlreadySubmitted);
        assert_eq!(data.insert_calls(), 1);
    }

    #[tokio::test]
    async fn test_reset_allows_new_submission() {
        let data = Arc::new(MockDataService::new());
        let mut controller = controller(data.clone());
        fill(&mut controller, "2210", "Ana");
        controller.submit().await.unwrap();

        controller.reset();

        assert_eq!(controller.state(), FormState::Idle);
        assert_eq!(controller.form(), &RsvpForm::default());
        assert!(controller.errors().is_empty());
        assert_eq!(controller.submission_error(), None);

        fill(&mut controller, "5678", "Luis");
        controller.submit().await.unwrap();
        assert_eq!(data.insert_calls(), 2);
    }

    #[tokio::test]
    async fn test_validation_errors_are_displayed_and_cleared_per_field() {
        let data = Arc::new(MockDataService::new());
        let mut controller = controller(data.clone());

        let err = controller.submit().await.unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(_)));
        assert_eq!(controller.errors().len(), 3);
        assert_eq!(controller.state(), FormState::Idle);

        controller.set_field(FormField::Pin, "1");
        assert!(!controller.errors().contains_key(&FormField::Pin));
        assert!(controller.errors().contains_key(&FormField::Name));

        controller.select_attendance(Attendance::NotAttending);
        assert!(!controller.errors().contains_key(&FormField::Attending));
        assert_eq!(data.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_unset_attendance_never_reaches_network() {
        let data = Arc::new(MockDataService::new());
        let mut controller = controller(data.clone());
        controller.set_field(FormField::Pin, "2210");
        controller.set_field(FormField::Name, "Ana");

        controller.submit().await.unwrap_err();

        assert!(controller.errors().contains_key(&FormField::Attending));
        assert_eq!(data.insert_calls(), 0);
        assert_eq!(data.pin_lookup_calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_pin_shows_pin_error() {
        let data = Arc::new(MockDataService::new());
        let mut controller = controller(data.clone());
        fill(&mut controller, "0000", "Ana");

        let err = controller.submit().await.unwrap_err();

        assert_eq!(err, SubmissionError::PinRejected);
        assert_eq!(controller.errors()[&FormField::Pin], PIN_REJECTED_MESSAGE);
        assert_eq!(controller.state(), FormState::Idle);
        assert_eq!(data.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_service_failure_keeps_form_for_retry() {
        let data = Arc::new(MockDataService::new());
        data.set_fail_inserts(true);
        let mut controller = controller(data.clone());
        fill(&mut controller, "4321", "Ana");
        controller.set_field(FormField::Message, "Nos vemos");

        controller.submit().await.unwrap_err();

        assert_eq!(controller.state(), FormState::Idle);
        assert_eq!(controller.submission_error(), Some(SUBMISSION_FAILED_MESSAGE));
        assert_eq!(controller.form().name, "Ana");
        assert_eq!(controller.form().message, "Nos vemos");

        data.set_fail_inserts(false);
        controller.submit().await.unwrap();
        assert!(controller.is_submitted());
        assert_eq!(controller.submission_error(), None);
        assert_eq!(data.inserted().len(), 1);
    }

    #[test]
    fn test_set_field_attending_parses_value() {
        let data = Arc::new(MockDataService::new());
        let mut controller = controller(data);

        controller.set_field(FormField::Attending, "no");
        assert_eq!(controller.form().attending, Some(Attendance::NotAttending));

        controller.set_field(FormField::Attending, "");
        assert_eq!(controller.form().attending, None);
        assert!(!controller.is_busy());
    }
}
