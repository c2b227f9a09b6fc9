use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AssignmentId, EventId, VolunteerId};

/// Link between a volunteer and an event. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub volunteer_id: VolunteerId,
    pub event_id: EventId,
    pub created_at: DateTime<Utc>,
}
