//! Direct PostgreSQL backend.

use async_trait::async_trait;
use domain::models::{NewRsvp, RsvpRecord};
use domain::services::{DataServiceError, RsvpDataService};
use sqlx::PgPool;

use crate::metrics::CallTimer;
use crate::repositories::{RsvpRepository, ValidPinRepository};

const BACKEND: &str = "postgres";

/// Data service backed by a PostgreSQL pool holding the `rsvps` and `valid_pins` tables.
#[derive(Clone)]
pub struct PgDataService {
    rsvps: RsvpRepository,
    pins: ValidPinRepository,
}

impl PgDataService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            rsvps: RsvpRepository::new(pool.clone()),
            pins: ValidPinRepository::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.rsvps.pool()
    }
}

fn database_error(err: sqlx::Error) -> DataServiceError {
    DataServiceError::Database(err.to_string())
}

#[async_trait]
impl RsvpDataService for PgDataService {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn insert_rsvp(&self, rsvp: &NewRsvp) -> Result<(), DataServiceError> {
        let timer = CallTimer::new(BACKEND, "insert_rsvp");
        let result = self.rsvps.insert(rsvp).await;
        timer.record();
        result.map(|_| ()).map_err(database_error)
    }

    async fn list_rsvps(&self) -> Result<Vec<RsvpRecord>, DataServiceError> {
        let timer = CallTimer::new(BACKEND, "list_rsvps");
        let result = self.rsvps.list_newest_first().await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(RsvpRecord::from).collect())
            .map_err(database_error)
    }

    async fn is_active_pin(&self, pin: &str) -> Result<bool, DataServiceError> {
        let timer = CallTimer::new(BACKEND, "is_active_pin");
        let result = self.pins.is_active(pin).await;
        timer.record();
        result.map_err(database_error)
    }

    async fn ping(&self) -> Result<(), DataServiceError> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map(|_| ())
            .map_err(database_error)
    }
}
