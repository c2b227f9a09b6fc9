pub mod sources;

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::DEFAULT_JWT_SECRET;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub reminders: ReminderSettings,
    pub cors: CorsConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory of front-end assets served for non-API paths.
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL URL. `None` selects the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn is_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub interval: Duration,
    pub lookahead: Duration,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
    }

    /// Entries that can be sent back as an `Access-Control-Allow-Origin`
    /// value. Blanks, `*` and values with spaces or control characters are
    /// dropped.
    pub fn explicit_origins(&self) -> Vec<&str> {
        self.allowed_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| {
                !origin.is_empty()
                    && *origin != "*"
                    && origin.bytes().all(|b| b.is_ascii_graphic())
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
