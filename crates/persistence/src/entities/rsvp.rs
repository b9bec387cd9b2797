//! RSVP entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::RsvpRecord;
use sqlx::FromRow;

/// Database row mapping for the rsvps table.
#[derive(Debug, Clone, FromRow)]
pub struct RsvpEntity {
    pub id: i64,
    pub name: String,
    pub attending: bool,
    pub message: Option<String>,
    pub pin_used: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<RsvpEntity> for RsvpRecord {
    fn from(entity: RsvpEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            attending: entity.attending,
            message: entity.message,
            pin_used: entity.pin_used,
            submitted_at: entity.submitted_at,
        }
    }
}
