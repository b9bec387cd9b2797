//! Domain models for the RSVP service.

pub mod form;
pub mod rsvp;

pub use form::{FieldErrors, FormField, FormState, RsvpForm};
pub use rsvp::{Attendance, NewRsvp, RsvpListing, RsvpRecord, RsvpStats};
