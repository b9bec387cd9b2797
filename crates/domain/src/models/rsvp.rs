//! RSVP domain models.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attendance choice made on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attendance {
    #[serde(rename = "yes")]
    Attending,
    #[serde(rename = "no")]
    NotAttending,
}

impl Attendance {
    /// Value stored in the `attending` column.
    pub fn as_bool(self) -> bool {
        matches!(self, Attendance::Attending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Attendance::Attending => "yes",
            Attendance::NotAttending => "no",
        }
    }
}

impl std::fmt::Display for Attendance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for Attendance {
    fn from(attending: bool) -> Self {
        if attending {
            Attendance::Attending
        } else {
            Attendance::NotAttending
        }
    }
}

/// Error returned when parsing an unknown attendance value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attendance value: {0}")]
pub struct ParseAttendanceError(pub String);

impl FromStr for Attendance {
    type Err = ParseAttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Attendance::Attending),
            "no" => Ok(Attendance::NotAttending),
            other => Err(ParseAttendanceError(other.to_string())),
        }
    }
}

/// A response ready to be inserted into the `rsvps` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRsvp {
    pub name: String,
    pub attending: bool,
    pub message: Option<String>,
    pub pin_used: String,
    pub submitted_at: DateTime<Utc>,
}

/// A stored response as returned by the data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpRecord {
    pub id: i64,
    pub name: String,
    pub attending: bool,
    pub message: Option<String>,
    pub pin_used: String,
    pub submitted_at: DateTime<Utc>,
}

/// Aggregate counts shown on the admin view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RsvpStats {
    pub attending: usize,
    pub not_attending: usize,
    pub total: usize,
}

impl RsvpStats {
    pub fn from_records(records: &[RsvpRecord]) -> Self {
        let attending = records.iter().filter(|r| r.attending).count();
        Self {
            attending,
            not_attending: records.len() - attending,
            total: records.len(),
        }
    }
}

/// Every stored response, newest first, with its counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RsvpListing {
    pub stats: RsvpStats,
    pub data: Vec<RsvpRecord>,
}
