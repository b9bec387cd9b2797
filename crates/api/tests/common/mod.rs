//! Common test utilities for integration tests.
//!
//! The app is built over `MockDataService`, so no database or network is needed.

// Not every helper is used by every test binary.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use domain::services::{MockDataService, PinSource, DEFAULT_VALID_PINS};
use rsvp_api::{
    app::create_app,
    config::{
        AdminConfig, Config, DataBackend, DataServiceConfig, DatabaseConfig, LoggingConfig,
        PinsConfig, SecurityConfig, ServerConfig,
    },
};

pub const ADMIN_KEY: &str = "test-admin-key";

/// Test configuration with rate limiting disabled.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
            max_body_size: 16_384,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            submit_rate_limit_per_minute: 0,
            hsts_enabled: false,
            trust_forwarded_for: false,
        },
        data_service: DataServiceConfig {
            backend: DataBackend::Memory,
            url: String::new(),
            api_key: String::new(),
            timeout_ms: 1_000,
            rsvps_table: "rsvps".to_string(),
            pins_table: "valid_pins".to_string(),
        },
        database: DatabaseConfig::default(),
        pins: PinsConfig {
            source: PinSource::Static,
            allowed: DEFAULT_VALID_PINS.iter().map(|p| p.to_string()).collect(),
        },
        admin: AdminConfig {
            api_key: ADMIN_KEY.to_string(),
        },
    }
}

/// App over a fresh mock; the mock is returned for inspection.
pub fn create_test_app(config: Config) -> (Router, Arc<MockDataService>) {
    let data = Arc::new(MockDataService::new());
    (create_app(config, data.clone()), data)
}

pub fn create_test_app_with(config: Config, data: Arc<MockDataService>) -> Router {
    create_app(config, data)
}

/// Build a JSON POST to the submission endpoint.
pub fn submit_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/rsvps")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request, optionally carrying the admin key.
pub fn get_request(uri: &str, admin_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(key) = admin_key {
        builder = builder.header("X-Admin-Key", key);
    }
    builder.body(Body::empty()).unwrap()
}

/// Parse response body as JSON.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

pub async fn response_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).into_owned()
}
