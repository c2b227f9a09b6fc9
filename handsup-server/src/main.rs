//! # Handsup Server
//!
//! Volunteer coordination service.
//!
//! - **Events**: public listing, admin create/update/delete/reset
//! - **Profiles**: volunteer skills, location and availability
//! - **Matching**: ranked event suggestions and on-demand scoring
//! - **Notices**: persisted notices with a live SSE feed per volunteer
//! - **Reminders**: a periodic scan that warns volunteers about events
//!   starting within the next day
//!
//! Runs against PostgreSQL when `DATABASE_URL` is set, otherwise against an
//! in-memory store that is lost on exit.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use handsup_config::{Config, ConfigLoad, ConfigLoader, ConfigWarnings};
use handsup_core::store::{PostgresStore, Store};
use handsup_server::{AppState, routes};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "handsup-server")]
#[command(
    about = "Volunteer coordination API with matching and event reminders"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Db(DbCommand::Migrate)) = cli.command {
        return run_db_migrate(&cli.serve).await;
    }

    run_server(cli.serve).await
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(args)?;
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL must be set to run migrations")?;

    let store = PostgresStore::connect(url, config.database.max_connections)
        .await
        .context("failed to connect to PostgreSQL for migration")?;
    store.migrate().await.context("database migration failed")?;
    store.close().await;
    info!("Database migrations applied successfully");
    Ok(())
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = args.config.clone() {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }
    log_warnings(&warnings);

    Ok(config)
}

fn log_warnings(warnings: &ConfigWarnings) {
    if warnings.is_empty() {
        return;
    }
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => warn!(
                message = %warning.message,
                hint = %hint,
                "configuration warning"
            ),
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }
}

async fn open_store(
    config: &Config,
) -> anyhow::Result<(Store, Option<Arc<PostgresStore>>)> {
    let Some(url) = config.database.url.as_deref() else {
        info!("DATABASE_URL not set; using the in-memory store");
        return Ok((Store::in_memory(), None));
    };

    info!("Connecting to PostgreSQL");
    let postgres = Arc::new(
        PostgresStore::connect(url, config.database.max_connections)
            .await
            .context("failed to connect to PostgreSQL")?,
    );
    postgres
        .migrate()
        .await
        .context("database migration failed")?;
    Ok((Store::from_postgres(postgres.clone()), Some(postgres)))
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let config = Arc::new(load_runtime_config(&args)?);
    let (store, postgres) = open_store(&config).await?;
    let state = AppState::new(Arc::clone(&config), store);

    let reminders = if config.reminders.enabled {
        Some(Arc::clone(state.reminders()).start())
    } else {
        info!("reminder scheduler disabled");
        None
    };

    let router = routes::create_app(state);
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Starting Handsup server on {}", addr);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(handle) = reminders {
        handle.stop().await;
    }
    if let Some(postgres) = postgres {
        postgres.close().await;
        info!("database pool closed");
    }

    served.context("server error")?;
    info!("Handsup server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
