//! Domain records shared by the store, the services and the HTTP layer.

pub mod account;
pub mod assignment;
pub mod event;
pub mod history;
pub mod ids;
pub mod notice;
pub mod skills;
pub mod volunteer;

pub use account::{Account, NewAccount, Role, normalize_email};
pub use assignment::Assignment;
pub use event::{Event, EventDraft, EventPayload, Urgency, ensure_event_payload};
pub use history::{HistoryEntry, NewHistoryEntry, ParticipationStatus};
pub use ids::{
    AccountId, AssignmentId, EventId, HistoryId, IdSequence, NoticeId,
    VolunteerId,
};
pub use notice::{NewNotice, Notice, NoticeKind};
pub use skills::normalize_skills;
pub use volunteer::{ProfileDraft, Volunteer, VolunteerProfile};
