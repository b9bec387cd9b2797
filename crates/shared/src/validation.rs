//! Field validation rules for the RSVP form.
//!
//! Each rule returns a `validator::ValidationError` carrying the message shown
//! next to the field, so callers can surface it verbatim.

use validator::ValidationError;

/// Number of digits in an invitation PIN.
pub const PIN_LENGTH: usize = 4;

/// Minimum length of a guest name after trimming.
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum length of a guest name after trimming.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length of the optional message after trimming.
pub const MAX_MESSAGE_LENGTH: usize = 1000;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates an invitation PIN: required, exactly four characters, all ASCII digits.
pub fn validate_pin_format(pin: &str) -> Result<(), ValidationError> {
    if pin.is_empty() {
        return Err(error("pin_required", "El código PIN es requerido"));
    }
    if pin.chars().count() != PIN_LENGTH {
        return Err(error("pin_length", "El código debe tener 4 dígitos"));
    }
    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(error("pin_digits", "El código solo puede contener números"));
    }
    Ok(())
}

/// Validates a guest name. Surrounding whitespace does not count towards its length.
pub fn validate_guest_name(name: &str) -> Result<(), ValidationError> {
    let length = name.trim().chars().count();
    if length == 0 {
        return Err(error("name_required", "Tu nombre es requerido"));
    }
    if length < MIN_NAME_LENGTH {
        return Err(error(
            "name_too_short",
            "El nombre debe tener al menos 2 caracteres",
        ));
    }
    if length > MAX_NAME_LENGTH {
        return Err(error(
            "name_too_long",
            "El nombre no puede superar los 100 caracteres",
        ));
    }
    Ok(())
}

/// Validates the optional free-text message.
pub fn validate_message(message: &str) -> Result<(), ValidationError> {
    if message.trim().chars().count() > MAX_MESSAGE_LENGTH {
        return Err(error(
            "message_too_long",
            "El mensaje no puede superar los 1000 caracteres",
        ));
    }
    Ok(())
}

/// Returns true if `pin` is a well-formed PIN. Used when checking configured allow-lists.
pub fn is_well_formed_pin(pin: &str) -> bool {
    validate_pin_format(pin).is_ok()
}
