//! Domain layer for the RSVP service.
//!
//! This crate contains:
//! - RSVP models and the form state
//! - The form controller and submission sequencer
//! - PIN verification and the admin listing
//! - The data service abstraction used by every backend

pub mod models;
pub mod services;
