//! Shared utilities for the RSVP service.
//!
//! This crate provides functionality used across the other crates:
//! - Field validation rules for the RSVP form
//! - Hashing helpers for admin key checks and PIN redaction

pub mod crypto;
pub mod validation;
