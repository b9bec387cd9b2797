//! Data service abstraction.
//!
//! The RSVP table and the valid-PIN table live in an external store. Every
//! backend (hosted REST table, direct PostgreSQL, in-memory) implements
//! [`RsvpDataService`]; one instance is built at startup and shared by reference.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use crate::models::{NewRsvp, RsvpRecord};

/// Errors raised by data service backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataServiceError {
    #[error("Data service request failed: {0}")]
    Transport(String),

    #[error("Data service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from data service: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Data service unavailable: {0}")]
    Unavailable(String),
}

/// Operations the RSVP service needs from the external store.
#[async_trait::async_trait]
pub trait RsvpDataService: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Insert one response into the `rsvps` table.
    async fn insert_rsvp(&self, rsvp: &NewRsvp) -> Result<(), DataServiceError>;

    /// All stored responses ordered by `submitted_at`, newest first.
    async fn list_rsvps(&self) -> Result<Vec<RsvpRecord>, DataServiceError>;

    /// Whether `pin` is present and active in the `valid_pins` table.
    async fn is_active_pin(&self, pin: &str) -> Result<bool, DataServiceError>;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), DataServiceError>;
}

/// In-memory data service for development and testing.
///
/// Records every call so tests can assert which network operations a flow
/// would have issued. Failures can be switched on per operation.
#[derive(Debug, Default)]
pub struct MockDataService {
    records: Mutex<Vec<RsvpRecord>>,
    inserted: Mutex<Vec<NewRsvp>>,
    active_pins: Mutex<BTreeSet<String>>,
    insert_calls: AtomicUsize,
    list_calls: AtomicUsize,
    pin_lookup_calls: AtomicUsize,
    fail_inserts: AtomicBool,
    fail_lists: AtomicBool,
    fail_pin_lookups: AtomicBool,
    fail_pings: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockDataService {
    /// Create an empty mock service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose `valid_pins` table holds the given active PINs.
    pub fn with_active_pins<I, S>(pins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let service = Self::default();
        lock(&service.active_pins).extend(pins.into_iter().map(Into::into));
        service
    }

    /// Seed a stored record, as if inserted earlier.
    pub fn seed_record(&self, record: RsvpRecord) {
        lock(&self.records).push(record);
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_pin_lookups(&self, fail: bool) {
        self.fail_pin_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_pings(&self, fail: bool) {
        self.fail_pings.store(fail, Ordering::SeqCst);
    }

    /// Payloads of every successful insert, in call order.
    pub fn inserted(&self) -> Vec<NewRsvp> {
        lock(&self.inserted).clone()
    }

    /// Number of insert calls, failed ones included.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn pin_lookup_calls(&self) -> usize {
        self.pin_lookup_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RsvpDataService for MockDataService {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert_rsvp(&self, rsvp: &NewRsvp) -> Result<(), DataServiceError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            tracing::warn!("Mock data service simulating insert failure");
            return Err(DataServiceError::Unavailable("simulated insert failure".into()));
        }

        let mut records = lock(&self.records);
        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        records.push(RsvpRecord {
            id,
            name: rsvp.name.clone(),
            attending: rsvp.attending,
            message: rsvp.message.clone(),
            pin_used: rsvp.pin_used.clone(),
            submitted_at: rsvp.submitted_at,
        });
        lock(&self.inserted).push(rsvp.clone());
        Ok(())
    }

    async fn list_rsvps(&self) -> Result<Vec<RsvpRecord>, DataServiceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(DataServiceError::Unavailable("simulated list failure".into()));
        }

        let mut records = lock(&self.records).clone();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(records)
    }

    async fn is_active_pin(&self, pin: &str) -> Result<bool, DataServiceError> {
        self.pin_lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_pin_lookups.load(Ordering::SeqCst) {
            return Err(DataServiceError::Unavailable("simulated lookup failure".into()));
        }
        Ok(lock(&self.active_pins).contains(pin))
    }

    async fn ping(&self) -> Result<(), DataServiceError> {
        if self.fail_pings.load(Ordering::SeqCst) {
            return Err(DataServiceError::Unavailable("simulated ping failure".into()));
        }
        Ok(())
    }
}
