use std::time::Duration;

/// Placeholder signing secret used when `JWT_SECRET` is unset. Accepted only
/// in dev mode.
pub const DEFAULT_JWT_SECRET: &str = "change-me-handsup-dev-secret";

/// Shortest JWT secret accepted outside dev mode.
pub const MIN_JWT_SECRET_LEN: usize = 32;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(12 * 60 * 60);
pub const DEFAULT_REMINDER_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_REMINDER_LOOKAHEAD: Duration =
    Duration::from_secs(24 * 60 * 60);

pub const CONFIG_PATH_ENV: &str = "HANDSUP_CONFIG_PATH";
