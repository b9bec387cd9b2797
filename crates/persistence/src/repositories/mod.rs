//! Repository implementations for database operations.

pub mod rsvp;
pub mod valid_pin;

pub use rsvp::RsvpRepository;
pub use valid_pin::ValidPinRepository;
