use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::constants::MIN_JWT_SECRET_LEN;
use crate::models::Config;

/// A non-fatal configuration problem, optionally with a remedy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "{} ({hint})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error(
        "JWT_SECRET is unset, the development placeholder, or shorter than {min} characters; set a strong secret or enable DEV_MODE"
    )]
    WeakSecret { min: usize },
    #[error("CORS_ALLOWED_ORIGINS contains '*' outside dev mode")]
    DangerousCorsWildcard,
    #[error(
        "CORS_ALLOWED_ORIGINS has no usable origin; list at least one origin or enable DEV_MODE"
    )]
    EmptyCorsAllowList,
    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },
}

/// Reject configurations that are unsafe to run, and collect warnings for the
/// ones that are merely unusual.
///
/// Dev mode downgrades the secret and CORS checks to warnings.
pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    require_positive("REMINDER_INTERVAL", config.reminders.interval)?;
    require_positive("REMINDER_LOOKAHEAD", config.reminders.lookahead)?;
    require_positive("JWT_TTL", config.auth.token_ttl)?;

    let weak_secret = config.auth.is_default_secret()
        || config.auth.jwt_secret.chars().count() < MIN_JWT_SECRET_LEN;
    if weak_secret {
        if !config.dev_mode {
            return Err(ConfigGuardRailError::WeakSecret {
                min: MIN_JWT_SECRET_LEN,
            });
        }
        warnings.push_with_hint(
            "JWT secret is weak or the development placeholder",
            "Set JWT_SECRET to a random string of at least 32 characters before deploying",
        );
    }

    if config.cors.is_wildcard_included() {
        if !config.dev_mode {
            return Err(ConfigGuardRailError::DangerousCorsWildcard);
        }
        warnings.push(
            "CORS allows any origin ('*'); only acceptable in dev mode",
        );
    }

    // Dev mode serves permissive CORS, so the list only matters outside it.
    if !config.dev_mode && config.cors.explicit_origins().is_empty() {
        return Err(ConfigGuardRailError::EmptyCorsAllowList);
    }

    if config.database.url.is_none() {
        warnings.push_with_hint(
            "DATABASE_URL not set; using the in-memory store (data is lost on restart)",
            "Point DATABASE_URL at PostgreSQL to persist data",
        );
    }

    if !config.reminders.enabled {
        warnings.push("reminder scheduler disabled (REMINDERS_ENABLED=false)");
    }

    Ok(warnings)
}

fn require_positive(
    name: &'static str,
    value: Duration,
) -> Result<(), ConfigGuardRailError> {
    if value.is_zero() {
        Err(ConfigGuardRailError::ZeroDuration { name })
    } else {
        Ok(())
    }
}
