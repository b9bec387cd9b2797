//! Domain services for the RSVP service.
//!
//! Services contain the submission flow and the admin listing, written
//! against the [`RsvpDataService`] abstraction.

pub mod data_service;
pub mod form_controller;
pub mod listing;
pub mod pin_verifier;
pub mod submission;

pub use data_service::{DataServiceError, MockDataService, RsvpDataService};
pub use form_controller::RsvpFormController;
pub use listing::{load_listing, LISTING_FAILED_MESSAGE};
pub use pin_verifier::{PinSource, PinVerifier, DEFAULT_VALID_PINS};
pub use submission::{
    SubmissionError, SubmissionSequencer, PIN_REJECTED_MESSAGE, SUBMISSION_FAILED_MESSAGE,
};
