//! Persistence ports and adapters.
//!
//! [`Store`] bundles one `Arc<dyn …>` per port so services can be built
//! against either adapter (or a test double for a single port).

pub mod memory;
#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub mod postgres;
pub mod ports;

use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

pub use memory::InMemoryStore;
#[cfg(feature = "database")]
pub use postgres::PostgresStore;
pub use ports::{
    AccountRepository, AssignmentRepository, EventRepository,
    HistoryRepository, NoticeRepository, VolunteerRepository,
};

#[derive(Clone)]
pub struct Store {
    pub volunteers: Arc<dyn VolunteerRepository>,
    pub events: Arc<dyn EventRepository>,
    pub assignments: Arc<dyn AssignmentRepository>,
    pub notices: Arc<dyn NoticeRepository>,
    pub history: Arc<dyn HistoryRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    backend: &'static str,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.backend)
            .field("volunteers", &type_name_of_val(self.volunteers.as_ref()))
            .field("events", &type_name_of_val(self.events.as_ref()))
            .field("assignments", &type_name_of_val(self.assignments.as_ref()))
            .field("notices", &type_name_of_val(self.notices.as_ref()))
            .field("history", &type_name_of_val(self.history.as_ref()))
            .field("accounts", &type_name_of_val(self.accounts.as_ref()))
            .finish()
    }
}

impl Store {
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(InMemoryStore::new()))
    }

    pub fn from_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            volunteers: store.clone(),
            events: store.clone(),
            assignments: store.clone(),
            notices: store.clone(),
            history: store.clone(),
            accounts: store,
            backend: "memory",
        }
    }

    #[cfg(feature = "database")]
    pub fn from_postgres(store: Arc<PostgresStore>) -> Self {
        Self {
            volunteers: store.clone(),
            events: store.clone(),
            assignments: store.clone(),
            notices: store.clone(),
            history: store.clone(),
            accounts: store,
            backend: "postgres",
        }
    }

    /// Swap the notice port, keeping every other port.
    pub fn with_notices(mut self, notices: Arc<dyn NoticeRepository>) -> Self {
        self.notices = notices;
        self
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }
}
