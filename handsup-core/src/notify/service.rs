use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{NoticeBus, topic_for};
use crate::domain::{EventId, NewNotice, Notice, VolunteerId};
use crate::error::Result;
use crate::store::NoticeRepository;

/// Persists notices and publishes them to live subscribers.
#[derive(Clone)]
pub struct NoticeService {
    notices: Arc<dyn NoticeRepository>,
    bus: Arc<NoticeBus>,
}

impl fmt::Debug for NoticeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoticeService")
            .field("notices", &type_name_of_val(self.notices.as_ref()))
            .field("bus", &self.bus)
            .finish()
    }
}

impl NoticeService {
    pub fn new(
        notices: Arc<dyn NoticeRepository>,
        bus: Arc<NoticeBus>,
    ) -> Self {
        Self { notices, bus }
    }

    pub fn bus(&self) -> &Arc<NoticeBus> {
        &self.bus
    }

    /// Validate, persist, then publish on `notice:<volunteerId>`.
    ///
    /// A persistence failure is returned before anything is published.
    pub async fn create(&self, notice: NewNotice) -> Result<Notice> {
        let notice = self.notices.insert(notice.validated()?).await?;
        let delivered =
            self.bus.publish(&topic_for(notice.volunteer_id), &notice);
        debug!(
            notice_id = %notice.id,
            volunteer_id = %notice.volunteer_id,
            kind = %notice.kind,
            delivered,
            "notice published"
        );
        Ok(notice)
    }

    pub async fn list_for(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<Notice>> {
        self.notices.list_for_volunteer(volunteer_id).await
    }

    pub async fn find_recent(
        &self,
        volunteer_id: VolunteerId,
        event_id: EventId,
        since: DateTime<Utc>,
    ) -> Result<Option<Notice>> {
        self.notices.find_recent(volunteer_id, event_id, since).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoticeKind;
    use crate::store::InMemoryStore;
    use parking_lot::Mutex;

    #[tokio::test]
    async fn create_persists_then_publishes() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(NoticeBus::new());
        let service = NoticeService::new(store.clone(), bus.clone());

        let seen: Arc<Mutex<Vec<Notice>>> = Arc::default();
        let sink = seen.clone();
        bus.subscribe(topic_for(VolunteerId(4)), move |n: &Notice| {
            sink.lock().push(n.clone())
        });

        let created = service
            .create(
                NewNotice::new(VolunteerId(4), "  Shift moved  ")
                    .with_kind(NoticeKind::Info),
            )
            .await
            .unwrap();

        assert_eq!(created.title, "Shift moved");
        assert_eq!(*seen.lock(), vec![created.clone()]);
        assert_eq!(
            service.list_for(VolunteerId(4)).await.unwrap(),
            vec![created]
        );
    }

    #[tokio::test]
    async fn invalid_notice_is_neither_stored_nor_published() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(NoticeBus::new());
        let service = NoticeService::new(store, bus.clone());

        let seen: Arc<Mutex<usize>> = Arc::default();
        let sink = seen.clone();
        bus.subscribe(topic_for(VolunteerId(4)), move |_: &Notice| {
            *sink.lock() += 1
        });

        let blank = NewNotice::new(VolunteerId(4), " ");
        assert!(service.create(blank).await.is_err());
        assert_eq!(*seen.lock(), 0);
        assert!(service.list_for(VolunteerId(4)).await.unwrap().is_empty());
    }
}
