use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::CONFIG_PATH_ENV;
use crate::util::{non_empty_var, parse_bool_var, parse_csv_var};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub reminders: FileReminderConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,
    /// Humantime string, e.g. `"12h"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_ttl: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileReminderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookahead: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

/// Environment-derived configuration values. Durations stay raw so that a
/// malformed value can be reported with its variable name.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub static_dir: Option<PathBuf>,
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub jwt_secret: Option<String>,
    pub jwt_ttl: Option<String>,
    pub reminders_enabled: Option<bool>,
    pub reminder_interval: Option<String>,
    pub reminder_lookahead: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: non_empty_var(CONFIG_PATH_ENV).map(PathBuf::from),
            server_host: non_empty_var("SERVER_HOST"),
            // SERVER_PORT wins over the shorter PORT alias.
            server_port: non_empty_var("SERVER_PORT")
                .or_else(|| non_empty_var("PORT"))
                .and_then(|s| s.parse().ok()),
            static_dir: non_empty_var("STATIC_DIR").map(PathBuf::from),
            database_url: non_empty_var("DATABASE_URL"),
            database_max_connections: non_empty_var("DATABASE_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok()),
            jwt_secret: non_empty_var("JWT_SECRET"),
            jwt_ttl: non_empty_var("JWT_TTL"),
            reminders_enabled: parse_bool_var("REMINDERS_ENABLED"),
            reminder_interval: non_empty_var("REMINDER_INTERVAL"),
            reminder_lookahead: non_empty_var("REMINDER_LOOKAHEAD"),
            cors_allowed_origins: parse_csv_var("CORS_ALLOWED_ORIGINS"),
            dev_mode: parse_bool_var("DEV_MODE"),
        }
    }
}
