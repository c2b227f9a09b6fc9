//! # Handsup Core
//!
//! Domain types and business logic for the Handsup volunteer service.
//!
//! ## Overview
//!
//! - **Domain**: volunteers, events, assignments, notices, participation
//!   history and accounts ([`domain`])
//! - **Matching**: the volunteer/event compatibility score ([`matching`])
//! - **Notices**: a topic-keyed synchronous bus plus the service that persists
//!   and fans out notices ([`notify`])
//! - **Reminders**: the periodic scan that warns volunteers about events
//!   starting within the lookahead window ([`reminder`])
//! - **Store**: repository ports with in-memory and PostgreSQL adapters
//!   ([`store`])
//!
//! ## Feature Flags
//!
//! - `database`: enables the PostgreSQL adapter and [`MIGRATOR`]
//! - `postgres-tests`: compiles the adapter tests that need a live database

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Password hashing for accounts
pub mod auth;

/// Domain records shared by every layer
pub mod domain;

/// Error types and error handling utilities
pub mod error;

/// Volunteer/event compatibility scoring
pub mod matching;

/// Notice bus and notice service
pub mod notify;

/// Periodic reminder scheduler
pub mod reminder;

/// Built-in event catalogue used by `POST /api/events/reset`
pub mod seed;

/// Repository ports and adapters
pub mod store;

/// Migrations for the PostgreSQL store.
#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use error::{CoreError, Result};
