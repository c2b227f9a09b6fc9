use async_trait::async_trait;

use crate::domain::{Assignment, EventId, VolunteerId};
use crate::error::Result;

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Link a volunteer to an event. Both must exist (`NotFound` otherwise).
    /// Assigning an existing pair returns the existing link.
    async fn assign(
        &self,
        volunteer_id: VolunteerId,
        event_id: EventId,
    ) -> Result<Assignment>;

    async fn list_all(&self) -> Result<Vec<Assignment>>;
}
