//! Periodic reminders for upcoming assignments.
//!
//! Each tick walks every assignment and sends one `warn` notice per
//! volunteer/event pair whose event starts within the lookahead window,
//! unless a notice about the same pair was already sent within that window.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::domain::{Assignment, Event, EventId, NewNotice};
use crate::notify::NoticeService;
use crate::store::Store;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_LOOKAHEAD: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderConfig {
    /// Time between ticks.
    pub interval: Duration,
    /// How far ahead an event may start and still get a reminder. Also the
    /// dedup window.
    pub lookahead: Duration,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}

impl ReminderConfig {
    fn lookahead_delta(&self) -> TimeDelta {
        TimeDelta::from_std(self.lookahead).unwrap_or(TimeDelta::MAX)
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub assignments: usize,
    pub sent: usize,
    pub duplicates: usize,
    pub missing_events: usize,
    pub failures: usize,
}

impl TickReport {
    fn is_quiet(&self) -> bool {
        self.sent == 0 && self.failures == 0
    }
}

#[derive(Debug)]
pub struct ReminderScheduler {
    store: Store,
    notices: NoticeService,
    config: ReminderConfig,
    in_flight: Mutex<()>,
}

impl ReminderScheduler {
    pub fn new(
        store: Store,
        notices: NoticeService,
        config: ReminderConfig,
    ) -> Self {
        Self {
            store,
            notices,
            config,
            in_flight: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    /// Run one scan as of `now`.
    ///
    /// Returns `None` without doing anything when another tick is still
    /// running. Store failures are logged and counted, never returned.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> Option<TickReport> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("reminder tick skipped: previous tick still running");
            return None;
        };

        let mut report = TickReport::default();
        let assignments = match self.store.assignments.list_all().await {
            Ok(assignments) => assignments,
            Err(err) => {
                warn!(error = %err, "failed to list assignments for reminders");
                report.failures += 1;
                return Some(report);
            }
        };
        report.assignments = assignments.len();

        let lookahead = self.config.lookahead_delta();
        let since = now - lookahead;
        let mut events: HashMap<EventId, Option<Event>> = HashMap::new();

        for assignment in &assignments {
            let Some(event) =
                self.event_for(assignment, &mut events, &mut report).await
            else {
                continue;
            };

            let until_start = event.date - now;
            if until_start <= TimeDelta::zero() || until_start >= lookahead {
                continue;
            }

            match self
                .notices
                .find_recent(assignment.volunteer_id, event.id, since)
                .await
            {
                Ok(Some(_)) => {
                    report.duplicates += 1;
                    continue;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        volunteer_id = %assignment.volunteer_id,
                        event_id = %event.id,
                        error = %err,
                        "reminder dedup lookup failed"
                    );
                    report.failures += 1;
                    continue;
                }
            }

            match self
                .notices
                .create(NewNotice::reminder(assignment.volunteer_id, &event))
                .await
            {
                Ok(notice) => {
                    debug!(
                        notice_id = %notice.id,
                        volunteer_id = %notice.volunteer_id,
                        event_id = %event.id,
                        "reminder sent"
                    );
                    report.sent += 1;
                }
                Err(err) => {
                    warn!(
                        volunteer_id = %assignment.volunteer_id,
                        event_id = %event.id,
                        error = %err,
                        "failed to send reminder"
                    );
                    report.failures += 1;
                }
            }
        }

        if report.is_quiet() {
            debug!(
                assignments = report.assignments,
                duplicates = report.duplicates,
                missing_events = report.missing_events,
                "reminder tick finished"
            );
        } else {
            info!(
                assignments = report.assignments,
                sent = report.sent,
                duplicates = report.duplicates,
                missing_events = report.missing_events,
                failures = report.failures,
                "reminder tick finished"
            );
        }
        Some(report)
    }

    /// Look the event up once per tick. Missing events and lookup failures
    /// both skip the pair.
    async fn event_for(
        &self,
        assignment: &Assignment,
        cache: &mut HashMap<EventId, Option<Event>>,
        report: &mut TickReport,
    ) -> Option<Event> {
        if let Some(cached) = cache.get(&assignment.event_id) {
            if cached.is_none() {
                report.missing_events += 1;
            }
            return cached.clone();
        }

        let event = match self.store.events.get(assignment.event_id).await {
            Ok(event) => event,
            Err(err) => {
                warn!(
                    volunteer_id = %assignment.volunteer_id,
                    event_id = %assignment.event_id,
                    error = %err,
                    "reminder event lookup failed"
                );
                None
            }
        };
        if event.is_none() {
            report.missing_events += 1;
        }
        cache.insert(assignment.event_id, event.clone());
        event
    }

    /// Spawn the periodic loop. The first tick runs immediately.
    pub fn start(self: Arc<Self>) -> ReminderHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        info!(
            interval_secs = self.config.interval.as_secs(),
            lookahead_secs = self.config.lookahead.as_secs(),
            "reminder scheduler started"
        );
        let task = tokio::spawn(reminder_loop(self, stop_rx));
        ReminderHandle { stop_tx, task }
    }
}

async fn reminder_loop(
    scheduler: Arc<ReminderScheduler>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = time::interval(scheduler.config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // Stop wins over a tick that became due while the last one ran.
        tokio::select! {
            biased;
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        if *stop_rx.borrow() {
            break;
        }
        scheduler.run_tick(Utc::now()).await;
    }

    info!("reminder scheduler stopped");
}

/// Handle to a running scheduler loop.
#[derive(Debug)]
pub struct ReminderHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReminderHandle {
    /// Stop the timer. A tick that is already running finishes first; no tick
    /// starts after this is called.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(err) = self.task.await {
            warn!(error = %err, "reminder scheduler task ended abnormally");
        }
    }
}
