//! Transient RSVP form state and its validation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::{validate_guest_name, validate_message, validate_pin_format};
use validator::ValidationError;

use super::rsvp::{Attendance, NewRsvp};

/// Message shown on the attendance field when no option was picked.
pub const ATTENDANCE_REQUIRED_MESSAGE: &str = "Por favor selecciona si podrás asistir";

/// A field on the RSVP form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Pin,
    Name,
    Attending,
    Message,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Pin => "pin",
            FormField::Name => "name",
            FormField::Attending => "attending",
            FormField::Message => "message",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to message, one entry per failing field. Empty means submittable.
pub type FieldErrors = BTreeMap<FormField, String>;

/// Lifecycle of a form between user interactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
    Submitted,
}

/// Raw values currently entered on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RsvpForm {
    pub pin: String,
    pub name: String,
    pub attending: Option<Attendance>,
    pub message: String,
}

fn record(errors: &mut FieldErrors, field: FormField, result: Result<(), ValidationError>) {
    if let Err(err) = result {
        let message = err
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| err.code.to_string());
        errors.insert(field, message);
    }
}

impl RsvpForm {
    /// Checks every field and returns the failing ones.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        record(&mut errors, FormField::Pin, validate_pin_format(&self.pin));
        record(&mut errors, FormField::Name, validate_guest_name(&self.name));
        if self.attending.is_none() {
            errors.insert(
                FormField::Attending,
                ATTENDANCE_REQUIRED_MESSAGE.to_string(),
            );
        }
        record(&mut errors, FormField::Message, validate_message(&self.message));
        errors
    }

    /// Builds the insert payload. Returns `None` while attendance is unset.
    pub fn to_new_rsvp(&self, submitted_at: DateTime<Utc>) -> Option<NewRsvp> {
        let attending = self.attending?;
        let message = self.message.trim();
        Some(NewRsvp {
            name: self.name.trim().to_string(),
            attending: attending.as_bool(),
            message: (!message.is_empty()).then(|| message.to_string()),
            pin_used: self.pin.clone(),
            submitted_at,
        })
    }
}
