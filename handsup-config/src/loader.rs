use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;

use crate::constants::{
    DEFAULT_HOST, DEFAULT_JWT_SECRET, DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT,
    DEFAULT_REMINDER_INTERVAL, DEFAULT_REMINDER_LOOKAHEAD, DEFAULT_TOKEN_TTL,
};
use crate::models::{
    AuthConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
    ReminderSettings, ServerConfig,
    sources::{EnvConfig, FileConfig},
};
use crate::util::parse_duration;
use crate::validation::{self, ConfigGuardRailError, ConfigWarnings};

const DEFAULT_CONFIG_LOCATIONS: &[&str] =
    &["handsup.toml", "config/handsup.toml"];

#[derive(Debug, Default, Clone)]
struct ConfigLoaderOptions {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this TOML file; it must exist.
    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    /// Load this dotenv file instead of searching for `.env`. A missing file
    /// is not an error.
    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env = EnvConfig::gather();
        let (file, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            compose_config(file, env, config_path, env_file_loaded)?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        // Explicit and env-provided paths must exist; default locations are
        // only probed.
        let path = match (&self.options.config_path, &env.config_path) {
            (Some(explicit), _) => explicit.clone(),
            (None, Some(from_env)) => from_env.clone(),
            (None, None) => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(found) => found,
                None => return Ok((None, None)),
            },
        };

        if !path.exists() {
            return Err(ConfigLoadError::MissingConfig { path });
        }

        let file = read_file_config(&path)?;
        Ok((Some(file), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn compose_config(
    file: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();
    if file.is_none() {
        warnings.push_with_hint(
            "No handsup.toml detected; using environment variables and defaults",
            "Set HANDSUP_CONFIG_PATH or place handsup.toml in the working directory",
        );
    }

    let FileConfig {
        server: file_server,
        database: file_database,
        auth: file_auth,
        reminders: file_reminders,
        cors: file_cors,
        dev_mode: file_dev_mode,
    } = file.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        static_dir: env.static_dir.or(file_server.static_dir),
    };

    let database = DatabaseConfig {
        url: env
            .database_url
            .or(file_database.url)
            .filter(|url| !url.trim().is_empty()),
        max_connections: env
            .database_max_connections
            .or(file_database.max_connections)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS),
    };

    let auth = AuthConfig {
        jwt_secret: env
            .jwt_secret
            .or(file_auth.jwt_secret)
            .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
        token_ttl: duration_setting(
            "JWT_TTL",
            env.jwt_ttl.or(file_auth.token_ttl),
            DEFAULT_TOKEN_TTL,
        )?,
    };

    let reminders = ReminderSettings {
        enabled: env
            .reminders_enabled
            .or(file_reminders.enabled)
            .unwrap_or(true),
        interval: duration_setting(
            "REMINDER_INTERVAL",
            env.reminder_interval.or(file_reminders.interval),
            DEFAULT_REMINDER_INTERVAL,
        )?,
        lookahead: duration_setting(
            "REMINDER_LOOKAHEAD",
            env.reminder_lookahead.or(file_reminders.lookahead),
            DEFAULT_REMINDER_LOOKAHEAD,
        )?,
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .or(file_cors.allowed_origins)
            .unwrap_or_else(default_cors_origins),
    };

    let config = Config {
        server,
        database,
        auth,
        reminders,
        cors,
        dev_mode: env.dev_mode.or(file_dev_mode).unwrap_or(false),
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
        },
    };

    warnings.extend(validation::apply_guard_rails(&config)?);
    Ok((config, warnings))
}

fn duration_setting(
    name: &'static str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigLoadError> {
    match raw {
        Some(raw) => parse_duration(&raw).map_err(|source| {
            ConfigLoadError::InvalidDuration {
                name,
                value: raw.clone(),
                source,
            }
        }),
        None => Ok(default),
    }
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid duration for {name}: '{value}'")]
    InvalidDuration {
        name: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
