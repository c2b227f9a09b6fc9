pub mod events;
pub mod health;
pub mod history;
pub mod matching;
pub mod notifications;
pub mod profile;
