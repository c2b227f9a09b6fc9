use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EventId, HistoryId, VolunteerId};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationStatus {
    Registered,
    Attended,
    NoShow,
    Cancelled,
}

impl ParticipationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationStatus::Registered => "registered",
            ParticipationStatus::Attended => "attended",
            ParticipationStatus::NoShow => "no_show",
            ParticipationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ParticipationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticipationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "registered" => Ok(Self::Registered),
            "attended" => Ok(Self::Attended),
            "no_show" => Ok(Self::NoShow),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::validation(format!(
                "unknown participation status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub volunteer_id: VolunteerId,
    pub event_id: EventId,
    pub status: ParticipationStatus,
    pub hours: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHistoryEntry {
    pub volunteer_id: VolunteerId,
    pub event_id: EventId,
    pub status: ParticipationStatus,
    pub hours: Option<f64>,
}

impl NewHistoryEntry {
    pub fn validate(&self) -> Result<()> {
        match self.hours {
            Some(hours) if !hours.is_finite() || hours < 0.0 => Err(
                CoreError::validation("hours must be a non-negative number"),
            ),
            _ => Ok(()),
        }
    }
}
