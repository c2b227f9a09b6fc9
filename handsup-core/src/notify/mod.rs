//! Notice fan-out.
//!
//! [`EventBus`] is the generic topic map; [`NoticeService`] persists a notice
//! through the store and then publishes it on the volunteer's topic.

pub mod bus;
pub mod service;

pub use bus::{EventBus, Subscription, SubscriptionId};
pub use service::NoticeService;

use crate::domain::{Notice, VolunteerId};

pub type NoticeBus = EventBus<Notice>;

/// Topic carrying every notice for one volunteer.
pub fn topic_for(volunteer_id: VolunteerId) -> String {
    format!("notice:{volunteer_id}")
}
