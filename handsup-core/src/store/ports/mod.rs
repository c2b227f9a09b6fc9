//! Repository ports. Each adapter in [`crate::store`] implements all of them.

pub mod accounts;
pub mod assignments;
pub mod events;
pub mod history;
pub mod notices;
pub mod volunteers;

pub use accounts::AccountRepository;
pub use assignments::AssignmentRepository;
pub use events::EventRepository;
pub use history::HistoryRepository;
pub use notices::NoticeRepository;
pub use volunteers::VolunteerRepository;
