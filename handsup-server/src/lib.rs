//! # Handsup Server
//!
//! Axum HTTP surface over `handsup-core`: authentication, events, volunteer
//! profiles, participation history, matching, notices and the live SSE
//! notice feed. The binary in `main.rs` wires configuration, the store and
//! the reminder scheduler around [`routes::create_app`].

pub mod auth;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use infra::errors::{AppError, AppResult};
