//! Process-local adapter used when no `DATABASE_URL` is configured.
//!
//! All tables sit behind one [`RwLock`], so every port operation is atomic
//! with respect to the others (an event delete and its assignment cascade are
//! never observed half-done).

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::ports::{
    AccountRepository, AssignmentRepository, EventRepository,
    HistoryRepository, NoticeRepository, VolunteerRepository,
};
use crate::domain::{
    Account, AccountId, Assignment, AssignmentId, Event, EventDraft, EventId,
    HistoryEntry, HistoryId, IdSequence, NewAccount, NewHistoryEntry,
    NewNotice, Notice, NoticeId, ProfileDraft, Volunteer, VolunteerId,
};
use crate::error::{CoreError, Result};

#[derive(Debug, Default)]
struct Tables {
    volunteers: BTreeMap<VolunteerId, Volunteer>,
    events: BTreeMap<EventId, Event>,
    assignments: Vec<Assignment>,
    notices: Vec<Notice>,
    history: Vec<HistoryEntry>,
    accounts: BTreeMap<AccountId, Account>,
}

impl Tables {
    fn require_volunteer(&self, id: VolunteerId) -> Result<()> {
        if self.volunteers.contains_key(&id) {
            Ok(())
        } else {
            Err(CoreError::not_found(format!("volunteer {id}")))
        }
    }

    fn require_event(&self, id: EventId) -> Result<()> {
        if self.events.contains_key(&id) {
            Ok(())
        } else {
            Err(CoreError::not_found(format!("event {id}")))
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    volunteer_ids: IdSequence,
    event_ids: IdSequence,
    assignment_ids: IdSequence,
    notice_ids: IdSequence,
    history_ids: IdSequence,
    account_ids: IdSequence,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VolunteerRepository for InMemoryStore {
    async fn get(&self, id: VolunteerId) -> Result<Option<Volunteer>> {
        Ok(self.tables.read().volunteers.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Volunteer>> {
        Ok(self.tables.read().volunteers.values().cloned().collect())
    }

    async fn create(&self, profile: ProfileDraft) -> Result<Volunteer> {
        let id = VolunteerId(self.volunteer_ids.next_id());
        let volunteer = profile.into_volunteer(id, Utc::now());
        self.tables.write().volunteers.insert(id, volunteer.clone());
        Ok(volunteer)
    }

    async fn upsert(
        &self,
        id: VolunteerId,
        profile: ProfileDraft,
    ) -> Result<Volunteer> {
        self.volunteer_ids.advance_past(id.get());
        let volunteer = profile.into_volunteer(id, Utc::now());
        self.tables.write().volunteers.insert(id, volunteer.clone());
        Ok(volunteer)
    }
}

fn sorted_events<'a>(events: impl Iterator<Item = &'a Event>) -> Vec<Event> {
    let mut events: Vec<Event> = events.cloned().collect();
    events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    events
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn get(&self, id: EventId) -> Result<Option<Event>> {
        Ok(self.tables.read().events.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Event>> {
        Ok(sorted_events(self.tables.read().events.values()))
    }

    async fn create(&self, draft: EventDraft) -> Result<Event> {
        let id = EventId(self.event_ids.next_id());
        let event = draft.into_event(id, Utc::now());
        self.tables.write().events.insert(id, event.clone());
        Ok(event)
    }

    async fn update(
        &self,
        id: EventId,
        draft: EventDraft,
    ) -> Result<Option<Event>> {
        let mut tables = self.tables.write();
        let Some(existing) = tables.events.get_mut(&id) else {
            return Ok(None);
        };
        *existing = draft.into_event(id, existing.created_at);
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: EventId) -> Result<bool> {
        let mut tables = self.tables.write();
        if tables.events.remove(&id).is_none() {
            return Ok(false);
        }
        tables.assignments.retain(|a| a.event_id != id);
        Ok(true)
    }

    async fn reset(&self, drafts: Vec<EventDraft>) -> Result<Vec<Event>> {
        let now = Utc::now();
        let mut tables = self.tables.write();
        tables.assignments.clear();
        tables.events = drafts
            .into_iter()
            .map(|draft| {
                let id = EventId(self.event_ids.next_id());
                (id, draft.into_event(id, now))
            })
            .collect();
        Ok(sorted_events(tables.events.values()))
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryStore {
    async fn assign(
        &self,
        volunteer_id: VolunteerId,
        event_id: EventId,
    ) -> Result<Assignment> {
        let mut tables = self.tables.write();
        tables.require_volunteer(volunteer_id)?;
        tables.require_event(event_id)?;

        if let Some(existing) = tables
            .assignments
            .iter()
            .find(|a| a.volunteer_id == volunteer_id && a.event_id == event_id)
        {
            return Ok(existing.clone());
        }

        let assignment = Assignment {
            id: AssignmentId(self.assignment_ids.next_id()),
            volunteer_id,
            event_id,
            created_at: Utc::now(),
        };
        tables.assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn list_all(&self) -> Result<Vec<Assignment>> {
        Ok(self.tables.read().assignments.clone())
    }
}

#[async_trait]
impl NoticeRepository for InMemoryStore {
    async fn insert(&self, notice: NewNotice) -> Result<Notice> {
        let notice =
            notice.into_notice(NoticeId(self.notice_ids.next_id()), Utc::now());
        self.tables.write().notices.push(notice.clone());
        Ok(notice)
    }

    async fn list_for_volunteer(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<Notice>> {
        // Insertion order is id order, so reversing gives newest first.
        Ok(self
            .tables
            .read()
            .notices
            .iter()
            .rev()
            .filter(|n| n.volunteer_id == volunteer_id)
            .cloned()
            .collect())
    }

    async fn find_recent(
        &self,
        volunteer_id: VolunteerId,
        event_id: EventId,
        since: DateTime<Utc>,
    ) -> Result<Option<Notice>> {
        Ok(self
            .tables
            .read()
            .notices
            .iter()
            .rev()
            .find(|n| {
                n.volunteer_id == volunteer_id
                    && n.event_id == Some(event_id)
                    && n.created_at >= since
            })
            .cloned())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryStore {
    async fn record(&self, entry: NewHistoryEntry) -> Result<HistoryEntry> {
        entry.validate()?;
        let mut tables = self.tables.write();
        tables.require_volunteer(entry.volunteer_id)?;
        tables.require_event(entry.event_id)?;

        let recorded = HistoryEntry {
            id: HistoryId(self.history_ids.next_id()),
            volunteer_id: entry.volunteer_id,
            event_id: entry.event_id,
            status: entry.status,
            hours: entry.hours,
            recorded_at: Utc::now(),
        };
        tables.history.push(recorded.clone());
        Ok(recorded)
    }

    async fn list_for_volunteer(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<HistoryEntry>> {
        Ok(self
            .tables
            .read()
            .history
            .iter()
            .rev()
            .filter(|h| h.volunteer_id == volunteer_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<(Account, Volunteer)> {
        let now = Utc::now();
        let mut tables = self.tables.write();
        if tables.accounts.values().any(|a| a.email == account.email) {
            return Err(CoreError::Conflict(format!(
                "email {} is already registered",
                account.email
            )));
        }

        let volunteer_id = VolunteerId(self.volunteer_ids.next_id());
        let volunteer = account.profile.into_volunteer(volunteer_id, now);
        let created = Account {
            id: AccountId(self.account_ids.next_id()),
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            volunteer_id,
            created_at: now,
        };

        tables.volunteers.insert(volunteer_id, volunteer.clone());
        tables.accounts.insert(created.id, created.clone());
        Ok((created, volunteer))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self
            .tables
            .read()
            .accounts
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>> {
        Ok(self.tables.read().accounts.get(&id).cloned())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.tables.read().accounts.len() as u64)
    }
}
