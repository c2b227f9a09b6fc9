use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EventId, NewNotice, Notice, VolunteerId};
use crate::error::Result;

#[async_trait]
pub trait NoticeRepository: Send + Sync {
    async fn insert(&self, notice: NewNotice) -> Result<Notice>;

    /// Notices for a volunteer, newest first.
    async fn list_for_volunteer(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<Notice>>;

    /// Most recent notice about `event_id` for `volunteer_id` created at or
    /// after `since`.
    async fn find_recent(
        &self,
        volunteer_id: VolunteerId,
        event_id: EventId,
        since: DateTime<Utc>,
    ) -> Result<Option<Notice>>;
}
