//! Prometheus metrics middleware.
//!
//! Provides HTTP request/response metrics, the RSVP outcome counter and the
//! `/metrics` export handler.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::services::SubmissionError;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Middleware to record HTTP request metrics.
///
/// Records the following metrics:
/// - `http_requests_total`: Counter with labels (method, path, status)
/// - `http_request_duration_seconds`: Histogram with labels (method, path)
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = method_to_str(req.method());
    // Matched route keeps asset paths from exploding label cardinality.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method,
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration);

    response
}

fn method_to_str(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}

/// Outcome label for `rsvp_submissions_total`.
pub fn submission_outcome(result: &Result<(), &SubmissionError>) -> &'static str {
    match result {
        Ok(()) => "submitted",
        Err(SubmissionError::Validation(_)) => "invalid",
        Err(SubmissionError::PinRejected) => "pin_rejected",
        Err(SubmissionError::Service(_)) => "service_error",
        Err(SubmissionError::AlreadySubmitted) => "duplicate",
    }
}

/// Count one RSVP submission attempt by outcome.
pub fn record_submission(outcome: &'static str) {
    counter!("rsvp_submissions_total", "outcome" => outcome).increment(1);
}

/// Count one admin listing load.
pub fn record_listing_load(success: bool) {
    let outcome = if success { "ok" } else { "error" };
    counter!("rsvp_listing_loads_total", "outcome" => outcome).increment(1);
}

/// Handler for /metrics endpoint that returns Prometheus text format.
pub async fn metrics_handler() -> impl IntoResponse {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        ),
    }
}

/// Install the global Prometheus recorder.
///
/// Call once at startup before any metrics are recorded. A second call
/// leaves the first recorder in place.
pub fn init_metrics() -> Result<(), BuildError> {
    if PROMETHEUS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets(&[0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0])?
        .install_recorder()?;

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        tracing::warn!("Prometheus handle already initialized");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::FieldErrors;
    use domain::services::DataServiceError;

    #[test]
    fn test_method_to_str() {
        assert_eq!(method_to_str(&Method::GET), "GET");
        assert_eq!(method_to_str(&Method::POST), "POST");
        assert_eq!(method_to_str(&Method::OPTIONS), "OPTIONS");
        assert_eq!(method_to_str(&Method::TRACE), "OTHER");
    }

    #[test]
    fn test_submission_outcome_labels() {
        assert_eq!(submission_outcome(&Ok(())), "submitted");
        assert_eq!(
            submission_outcome(&Err(&SubmissionError::Validation(FieldErrors::new()))),
            "invalid"
        );
        assert_eq!(
            submission_outcome(&Err(&SubmissionError::PinRejected)),
            "pin_rejected"
        );
        assert_eq!(
            submission_outcome(&Err(&SubmissionError::Service(
                DataServiceError::Unavailable("down".into())
            ))),
            "service_error"
        );
    }
}
