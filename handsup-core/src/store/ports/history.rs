use async_trait::async_trait;

use crate::domain::{HistoryEntry, NewHistoryEntry, VolunteerId};
use crate::error::Result;

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Record participation. The volunteer and event must exist.
    async fn record(&self, entry: NewHistoryEntry) -> Result<HistoryEntry>;

    /// Entries for a volunteer, most recent first.
    async fn list_for_volunteer(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<HistoryEntry>>;
}
