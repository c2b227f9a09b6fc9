use std::{fmt, sync::Arc};

use handsup_config::Config;
use handsup_core::notify::{NoticeBus, NoticeService};
use handsup_core::reminder::{ReminderConfig, ReminderScheduler};
use handsup_core::store::Store;

use crate::auth::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    store: Store,
    notices: NoticeService,
    reminders: Arc<ReminderScheduler>,
    jwt: Arc<JwtKeys>,
    config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.store.backend())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build the notice bus, the notice service and the reminder scheduler
    /// around `store`. The scheduler is constructed but not started.
    pub fn new(config: Arc<Config>, store: Store) -> Self {
        let bus = Arc::new(NoticeBus::new());
        let notices = NoticeService::new(store.notices.clone(), bus);
        let reminders = Arc::new(ReminderScheduler::new(
            store.clone(),
            notices.clone(),
            ReminderConfig {
                interval: config.reminders.interval,
                lookahead: config.reminders.lookahead,
            },
        ));
        let jwt = Arc::new(JwtKeys::new(
            &config.auth.jwt_secret,
            config.auth.token_ttl,
        ));

        Self {
            store,
            notices,
            reminders,
            jwt,
            config,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn notices(&self) -> &NoticeService {
        &self.notices
    }

    pub fn reminders(&self) -> &Arc<ReminderScheduler> {
        &self.reminders
    }

    pub fn jwt(&self) -> &JwtKeys {
        &self.jwt
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
