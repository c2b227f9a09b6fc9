//! Configuration loading for Handsup.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! TOML file, and the process environment (after `.env` has been loaded).
//! [`ConfigLoader::load`] returns the composed [`Config`] together with any
//! non-fatal [`ConfigWarnings`]; guard-rail violations are errors.

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader};
pub use models::{
    AuthConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
    ReminderSettings, ServerConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
