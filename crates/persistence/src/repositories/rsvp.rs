//! RSVP repository for database operations.

use domain::models::NewRsvp;
use sqlx::PgPool;

use crate::entities::RsvpEntity;

/// Repository for the rsvps table. Rows are only ever inserted and read.
#[derive(Clone)]
pub struct RsvpRepository {
    pool: PgPool,
}

impl RsvpRepository {
    /// Creates a new RsvpRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a response and return the stored row.
    pub async fn insert(&self, rsvp: &NewRsvp) -> Result<RsvpEntity, sqlx::Error> {
        sqlx::query_as::<_, RsvpEntity>(
            r#"
            INSERT INTO rsvps (name, attending, message, pin_used, submitted_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, attending, message, pin_used, submitted_at
            "#,
        )
        .bind(&rsvp.name)
        .bind(rsvp.attending)
        .bind(rsvp.message.as_deref())
        .bind(&rsvp.pin_used)
        .bind(rsvp.submitted_at)
        .fetch_one(&self.pool)
        .await
    }

    /// All responses, newest first.
    pub async fn list_newest_first(&self) -> Result<Vec<RsvpEntity>, sqlx::Error> {
        sqlx::query_as::<_, RsvpEntity>(
            r#"
            SELECT id, name, attending, message, pin_used, submitted_at
            FROM rsvps
            ORDER BY submitted_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
