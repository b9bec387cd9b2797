//! Data service call metrics.
//!
//! Both backends time their calls into the same histogram so dashboards do
//! not care which one is configured.

use metrics::histogram;
use std::time::Instant;

/// Record the duration of one data service call.
pub fn record_call_duration(backend: &'static str, operation: &'static str, duration_secs: f64) {
    histogram!(
        "data_service_call_duration_seconds",
        "backend" => backend,
        "operation" => operation
    )
    .record(duration_secs);
}

/// Times a data service call and records it when finished.
///
/// Usage:
/// ```ignore
/// let timer = CallTimer::new("postgres", "insert_rsvp");
/// let result = repo.insert(&rsvp).await;
/// timer.record();
/// result
/// ```
pub struct CallTimer {
    backend: &'static str,
    operation: &'static str,
    start: Instant,
}

impl CallTimer {
    pub fn new(backend: &'static str, operation: &'static str) -> Self {
        Self {
            backend,
            operation,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        record_call_duration(
            self.backend,
            self.operation,
            self.start.elapsed().as_secs_f64(),
        );
    }
}
