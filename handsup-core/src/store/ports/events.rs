use async_trait::async_trait;

use crate::domain::{Event, EventDraft, EventId};
use crate::error::Result;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn get(&self, id: EventId) -> Result<Option<Event>>;

    /// All events ordered by date, then id.
    async fn list(&self) -> Result<Vec<Event>>;

    async fn create(&self, draft: EventDraft) -> Result<Event>;

    /// Replace an event's fields. Returns `None` when the id is unknown.
    async fn update(
        &self,
        id: EventId,
        draft: EventDraft,
    ) -> Result<Option<Event>>;

    /// Delete an event and its assignments. Returns whether it existed.
    async fn delete(&self, id: EventId) -> Result<bool>;

    /// Atomically replace every event (and drop every assignment) with
    /// `drafts`.
    async fn reset(&self, drafts: Vec<EventDraft>) -> Result<Vec<Event>>;
}
