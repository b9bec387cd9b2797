//! Hosted REST table backend.
//!
//! Talks to a tabular store exposing the PostgREST dialect (`/rest/v1/{table}`,
//! `column=eq.value` filters, `order=column.desc`). The client is built once
//! and shared; requests are independent and carry no session state.

use std::time::Duration;

use async_trait::async_trait;
use domain::models::{NewRsvp, RsvpRecord};
use domain::services::{DataServiceError, RsvpDataService};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use tracing::debug;

use crate::metrics::CallTimer;

const BACKEND: &str = "rest";

/// Connection settings for the hosted REST table API.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project URL, e.g. `https://project.example.co`.
    pub base_url: String,
    /// Key sent as `apikey` and as a bearer token.
    pub api_key: String,
    pub timeout_ms: u64,
    pub rsvps_table: String,
    pub pins_table: String,
}

/// Data service backed by a hosted REST table API.
#[derive(Debug, Clone)]
pub struct RestDataService {
    client: Client,
    config: RestConfig,
}

fn transport_error(err: reqwest::Error) -> DataServiceError {
    if err.is_decode() {
        DataServiceError::Decode(err.to_string())
    } else if err.is_timeout() {
        DataServiceError::Transport(format!("request timed out: {err}"))
    } else {
        DataServiceError::Transport(err.to_string())
    }
}

/// Turns non-2xx responses into `DataServiceError::Status`, keeping the body for logs.
async fn check_status(response: Response) -> Result<Response, DataServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DataServiceError::Status {
        status: status.as_u16(),
        body,
    })
}

impl RestDataService {
    /// Build the shared HTTP client with auth headers attached to every request.
    pub fn new(config: RestConfig) -> Result<Self, DataServiceError> {
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| DataServiceError::Transport(format!("Invalid API key header: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| DataServiceError::Transport(format!("Invalid API key header: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(transport_error)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    /// `{base_url}/rest/v1/{table}`, tolerant of a trailing slash on the base.
    pub fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            table
        )
    }

    async fn timed<T, F>(&self, operation: &'static str, call: F) -> Result<T, DataServiceError>
    where
        F: std::future::Future<Output = Result<T, DataServiceError>>,
    {
        let timer = CallTimer::new(BACKEND, operation);
        let result = call.await;
        timer.record();
        if let Err(ref err) = result {
            debug!(operation, error = %err, "REST data service call failed");
        }
        result
    }
}

#[async_trait]
impl RsvpDataService for RestDataService {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn insert_rsvp(&self, rsvp: &NewRsvp) -> Result<(), DataServiceError> {
        let url = self.table_url(&self.config.rsvps_table);
        self.timed("insert_rsvp", async {
            let response = self
                .client
                .post(&url)
                .header("Prefer", "return=minimal")
                .json(&[rsvp])
                .send()
                .await
                .map_err(transport_error)?;
            check_status(response).await.map(|_| ())
        })
        .await
    }

    async fn list_rsvps(&self) -> Result<Vec<RsvpRecord>, DataServiceError> {
        let url = self.table_url(&self.config.rsvps_table);
        self.timed("list_rsvps", async {
            let response = self
                .client
                .get(&url)
                .query(&[("select", "*"), ("order", "submitted_at.desc")])
                .send()
                .await
                .map_err(transport_error)?;
            check_status(response)
                .await?
                .json::<Vec<RsvpRecord>>()
                .await
                .map_err(|e| DataServiceError::Decode(e.to_string()))
        })
        .await
    }

    async fn is_active_pin(&self, pin: &str) -> Result<bool, DataServiceError> {
        let url = self.table_url(&self.config.pins_table);
        let pin_filter = format!("eq.{pin}");
        self.timed("is_active_pin", async {
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("select", "pin_code"),
                    ("pin_code", pin_filter.as_str()),
                    ("is_active", "eq.true"),
                    ("limit", "1"),
                ])
                .send()
                .await
                .map_err(transport_error)?;
            let rows = check_status(response)
                .await?
                .json::<Vec<serde::de::IgnoredAny>>()
                .await
                .map_err(|e| DataServiceError::Decode(e.to_string()))?;
            Ok(!rows.is_empty())
        })
        .await
    }

    async fn ping(&self) -> Result<(), DataServiceError> {
        let url = self.table_url(&self.config.rsvps_table);
        self.timed("ping", async {
            let response = self
                .client
                .get(&url)
                .query(&[("select", "id"), ("limit", "1")])
                .send()
                .await
                .map_err(transport_error)?;
            check_status(response).await.map(|_| ())
        })
        .await
    }
}
