use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use handsup_core::domain::{
    Assignment, Event, EventDraft, EventId, NewNotice, Notice, NoticeId,
    NoticeKind, ProfileDraft, Urgency, VolunteerId, normalize_skills,
};
use handsup_core::notify::{NoticeBus, NoticeService, topic_for};
use handsup_core::reminder::{ReminderConfig, ReminderScheduler};
use handsup_core::store::{
    AssignmentRepository, EventRepository, InMemoryStore, NoticeRepository,
    Store, VolunteerRepository,
};
use handsup_core::{CoreError, Result};
use mockall::mock;
use parking_lot::Mutex;
use tokio::sync::Notify;

mock! {
    pub Notices {}

    #[async_trait]
    impl NoticeRepository for Notices {
        async fn insert(&self, notice: NewNotice) -> Result<Notice>;
        async fn list_for_volunteer(
            &self,
            volunteer_id: VolunteerId,
        ) -> Result<Vec<Notice>>;
        async fn find_recent(
            &self,
            volunteer_id: VolunteerId,
            event_id: EventId,
            since: DateTime<Utc>,
        ) -> Result<Option<Notice>>;
    }
}

struct Fixture {
    memory: Arc<InMemoryStore>,
    store: Store,
    bus: Arc<NoticeBus>,
}

impl Fixture {
    fn new() -> Self {
        let memory = Arc::new(InMemoryStore::new());
        Self {
            store: Store::from_memory(memory.clone()),
            memory,
            bus: Arc::new(NoticeBus::new()),
        }
    }

    fn scheduler(&self) -> ReminderScheduler {
        let notices =
            NoticeService::new(self.store.notices.clone(), self.bus.clone());
        ReminderScheduler::new(
            self.store.clone(),
            notices,
            ReminderConfig::default(),
        )
    }

    async fn volunteer(&self, name: &str) -> VolunteerId {
        VolunteerRepository::create(
            self.memory.as_ref(),
            ProfileDraft {
                name: name.into(),
                location: "Houston".into(),
                skills: normalize_skills(["Cooking"]),
                preferences: None,
                availability: Vec::new(),
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn event_in(&self, name: &str, starts_in: Duration) -> Event {
        EventRepository::create(
            self.memory.as_ref(),
            EventDraft {
                name: name.into(),
                description: "Serve dinner".into(),
                location: "Houston".into(),
                required_skills: normalize_skills(["Cooking"]),
                date: Utc::now() + starts_in,
                urgency: Urgency::High,
            },
        )
        .await
        .unwrap()
    }

    async fn assign(&self, volunteer: VolunteerId, event: EventId) {
        self.memory.assign(volunteer, event).await.unwrap();
    }

    async fn notices_for(&self, volunteer: VolunteerId) -> Vec<Notice> {
        self.store.notices.list_for_volunteer(volunteer).await.unwrap()
    }
}

#[tokio::test]
async fn event_23_hours_out_gets_one_warn_notice() {
    let fx = Fixture::new();
    let volunteer = fx.volunteer("Ada").await;
    let event = fx.event_in("Shelter Meal", Duration::hours(23)).await;
    fx.assign(volunteer, event.id).await;

    let report = fx.scheduler().run_tick(Utc::now()).await.unwrap();
    assert_eq!(report.sent, 1);

    let notices = fx.notices_for(volunteer).await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Warn);
    assert!(notices[0].title.starts_with("Reminder: Shelter Meal"));
    assert_eq!(notices[0].event_id, Some(event.id));
    assert!(notices[0].body.as_deref().unwrap().starts_with("Houston • "));
}

#[tokio::test]
async fn events_outside_the_window_are_ignored() {
    let fx = Fixture::new();
    let volunteer = fx.volunteer("Ada").await;
    let later = fx.event_in("Later", Duration::hours(25)).await;
    let past = fx.event_in("Past", Duration::hours(-1)).await;
    fx.assign(volunteer, later.id).await;
    fx.assign(volunteer, past.id).await;

    let report = fx.scheduler().run_tick(Utc::now()).await.unwrap();
    assert_eq!(report.assignments, 2);
    assert_eq!(report.sent, 0);
    assert!(fx.notices_for(volunteer).await.is_empty());
}

#[tokio::test]
async fn second_tick_in_the_window_sends_nothing() {
    let fx = Fixture::new();
    let volunteer = fx.volunteer("Ada").await;
    let event = fx.event_in("Shelter Meal", Duration::hours(23)).await;
    fx.assign(volunteer, event.id).await;
    let scheduler = fx.scheduler();

    scheduler.run_tick(Utc::now()).await.unwrap();
    let second = scheduler.run_tick(Utc::now()).await.unwrap();

    assert_eq!(second.sent, 0);
    assert_eq!(second.duplicates, 1);
    assert_eq!(fx.notices_for(volunteer).await.len(), 1);
}

#[tokio::test]
async fn tick_publishes_on_the_volunteer_topic() {
    let fx = Fixture::new();
    let volunteer = fx.volunteer("Ada").await;
    let other = fx.volunteer("Grace").await;
    let event = fx.event_in("Shelter Meal", Duration::hours(2)).await;
    fx.assign(volunteer, event.id).await;

    let seen: Arc<Mutex<Vec<Notice>>> = Arc::default();
    let sink = seen.clone();
    fx.bus.subscribe(topic_for(volunteer), move |n: &Notice| {
        sink.lock().push(n.clone())
    });
    let stray: Arc<Mutex<Vec<Notice>>> = Arc::default();
    let stray_sink = stray.clone();
    fx.bus.subscribe(topic_for(other), move |n: &Notice| {
        stray_sink.lock().push(n.clone())
    });

    fx.scheduler().run_tick(Utc::now()).await.unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].volunteer_id, volunteer);
    assert!(stray.lock().is_empty());
}

#[tokio::test]
async fn missing_event_is_skipped_and_counted() {
    let fx = Fixture::new();
    let volunteer = fx.volunteer("Ada").await;
    let kept = fx.event_in("Kept", Duration::hours(5)).await;
    fx.assign(volunteer, kept.id).await;

    // An assignment whose event lookup comes back empty.
    let mut store = fx.store.clone();
    store.assignments = Arc::new(ExtraAssignment {
        inner: fx.memory.clone(),
        extra: Assignment {
            id: handsup_core::domain::AssignmentId(99),
            volunteer_id: volunteer,
            event_id: EventId(404),
            created_at: Utc::now(),
        },
    });
    let notices = NoticeService::new(store.notices.clone(), fx.bus.clone());
    let scheduler =
        ReminderScheduler::new(store, notices, ReminderConfig::default());

    let report = scheduler.run_tick(Utc::now()).await.unwrap();
    assert_eq!(report.missing_events, 1);
    assert_eq!(report.sent, 1);
}

#[tokio::test]
async fn failing_pair_does_not_stop_the_tick() {
    let fx = Fixture::new();
    let broken = fx.volunteer("Ada").await;
    let healthy = fx.volunteer("Grace").await;
    let event = fx.event_in("Shelter Meal", Duration::hours(3)).await;
    fx.assign(broken, event.id).await;
    fx.assign(healthy, event.id).await;

    let mut mock = MockNotices::new();
    mock.expect_find_recent().returning(|_, _, _| Ok(None));
    mock.expect_insert().times(2).returning(move |notice| {
        if notice.volunteer_id == broken {
            Err(CoreError::Persistence("connection reset".into()))
        } else {
            Ok(notice.into_notice(NoticeId(1), Utc::now()))
        }
    });

    let store = fx.store.clone().with_notices(Arc::new(mock));
    let delivered: Arc<Mutex<Vec<VolunteerId>>> = Arc::default();
    let sink = delivered.clone();
    fx.bus.subscribe(topic_for(healthy), move |n: &Notice| {
        sink.lock().push(n.volunteer_id)
    });
    let notices = NoticeService::new(store.notices.clone(), fx.bus.clone());
    let scheduler =
        ReminderScheduler::new(store, notices, ReminderConfig::default());

    let report = scheduler.run_tick(Utc::now()).await.unwrap();
    assert_eq!(report.failures, 1);
    assert_eq!(report.sent, 1);
    assert_eq!(*delivered.lock(), vec![healthy]);
}

#[tokio::test]
async fn overlapping_tick_is_skipped() {
    let fx = Fixture::new();
    let gate = Arc::new(Notify::new());
    let entered = Arc::new(Notify::new());

    let mut store = fx.store.clone();
    store.assignments = Arc::new(GatedAssignments {
        inner: fx.memory.clone(),
        gate: gate.clone(),
        entered: entered.clone(),
    });
    let notices = NoticeService::new(store.notices.clone(), fx.bus.clone());
    let scheduler = Arc::new(ReminderScheduler::new(
        store,
        notices,
        ReminderConfig::default(),
    ));

    let first = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.run_tick(Utc::now()).await }
    });
    entered.notified().await;

    assert!(scheduler.run_tick(Utc::now()).await.is_none());

    gate.notify_one();
    assert!(first.await.unwrap().is_some());
}

#[tokio::test]
async fn started_scheduler_ticks_immediately_and_stops() {
    let fx = Fixture::new();
    let volunteer = fx.volunteer("Ada").await;
    let event = fx.event_in("Shelter Meal", Duration::hours(1)).await;
    fx.assign(volunteer, event.id).await;

    let notices = NoticeService::new(fx.store.notices.clone(), fx.bus.clone());
    let scheduler = Arc::new(ReminderScheduler::new(
        fx.store.clone(),
        notices,
        ReminderConfig {
            interval: StdDuration::from_secs(3600),
            ..ReminderConfig::default()
        },
    ));
    let handle = scheduler.start();

    let mut delivered = false;
    for _ in 0..100 {
        if !fx.notices_for(volunteer).await.is_empty() {
            delivered = true;
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    assert!(delivered, "first tick should run right after start");

    handle.stop().await;
    assert_eq!(fx.notices_for(volunteer).await.len(), 1);
}

#[tokio::test]
async fn no_tick_starts_after_stop_is_requested() {
    for _ in 0..10 {
        let fx = Fixture::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let entered = Arc::new(Notify::new());

        let mut store = fx.store.clone();
        store.assignments = Arc::new(SlowAssignments {
            inner: fx.memory.clone(),
            calls: calls.clone(),
            entered: entered.clone(),
        });
        let notices =
            NoticeService::new(store.notices.clone(), fx.bus.clone());
        let scheduler = Arc::new(ReminderScheduler::new(
            store,
            notices,
            ReminderConfig {
                interval: StdDuration::from_millis(10),
                ..ReminderConfig::default()
            },
        ));

        let handle = scheduler.start();
        entered.notified().await;

        // Ticks take longer than the interval, so the next one is overdue by
        // the time this one finishes.
        let started = calls.load(Ordering::SeqCst);
        handle.stop().await;
        assert_eq!(calls.load(Ordering::SeqCst), started);
    }
}

struct ExtraAssignment {
    inner: Arc<InMemoryStore>,
    extra: Assignment,
}

#[async_trait]
impl AssignmentRepository for ExtraAssignment {
    async fn assign(
        &self,
        volunteer_id: VolunteerId,
        event_id: EventId,
    ) -> Result<Assignment> {
        self.inner.assign(volunteer_id, event_id).await
    }

    async fn list_all(&self) -> Result<Vec<Assignment>> {
        let mut all = self.inner.list_all().await?;
        all.push(self.extra.clone());
        Ok(all)
    }
}

struct GatedAssignments {
    inner: Arc<InMemoryStore>,
    gate: Arc<Notify>,
    entered: Arc<Notify>,
}

#[async_trait]
impl AssignmentRepository for GatedAssignments {
    async fn assign(
        &self,
        volunteer_id: VolunteerId,
        event_id: EventId,
    ) -> Result<Assignment> {
        self.inner.assign(volunteer_id, event_id).await
    }

    async fn list_all(&self) -> Result<Vec<Assignment>> {
        self.entered.notify_one();
        self.gate.notified().await;
        self.inner.list_all().await
    }
}

struct SlowAssignments {
    inner: Arc<InMemoryStore>,
    calls: Arc<AtomicUsize>,
    entered: Arc<Notify>,
}

#[async_trait]
impl AssignmentRepository for SlowAssignments {
    async fn assign(
        &self,
        volunteer_id: VolunteerId,
        event_id: EventId,
    ) -> Result<Assignment> {
        self.inner.assign(volunteer_id, event_id).await
    }

    async fn list_all(&self) -> Result<Vec<Assignment>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        tokio::time::sleep(StdDuration::from_millis(60)).await;
        self.inner.list_all().await
    }
}
