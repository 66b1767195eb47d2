//! Server assembly for the Account App.
//!
//! Wires configuration, telemetry, storage and the HTTP layer together. The
//! root package's binaries are thin wrappers around [`run`] and [`seed`].

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::dev::Server;
use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer};
use tracing_actix_web::TracingLogger;

use account_actix::AppState;
use account_config::{Config, DatabaseConfig};
use account_core::{random, AccountError, RootPath, SeedData};
use account_observability::actix::track_requests;
use account_observability::{init_telemetry, shutdown_telemetry, Metrics, ObservedStorage};
use account_ports::DynStorage;
use account_storage_sqlx::SqlxStorage;

const SERVICE_NAME: &str = "account_app";

/// Create the storage backend for `database_url`, wrapped for tracing.
///
/// Supported: `postgres://...` and `sqlite:...` (SQLx backend).
pub async fn create_storage(database_url: &str) -> Result<DynStorage, AccountError> {
    let storage = SqlxStorage::new(database_url).await?;
    let db_system =
        if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            "postgresql"
        } else if database_url.starts_with("sqlite:") {
            "sqlite"
        } else {
            "sql"
        };

    let inner: DynStorage = Arc::new(storage);
    Ok(Arc::new(ObservedStorage::new(inner, db_system.to_string())))
}

/// The configured seed fixture, or the bundled one.
pub fn load_seed(database: &DatabaseConfig) -> Result<SeedData, AccountError> {
    match database.seed_file.as_deref() {
        Some(path) => SeedData::from_path(path),
        None => SeedData::default_fixture(),
    }
}

/// Cookie signing key from config; an ephemeral one when none is configured.
pub fn session_key(config: &Config) -> Result<Key, AccountError> {
    match config
        .session_key_bytes()
        .map_err(|e| AccountError::invalid_request(&e))?
    {
        Some(bytes) => Ok(Key::from(bytes.as_slice())),
        None => {
            tracing::warn!("no session key configured, sessions will not survive a restart");
            Ok(Key::from(random::bytes(64).as_slice()))
        }
    }
}

/// Build the shared application state. Must run inside an actix system.
pub async fn build_state(config: &Config, metrics: Metrics) -> Result<AppState, AccountError> {
    let storage = create_storage(&config.database.url).await?;
    storage.init().await?;

    if config.database.seed_on_start {
        let seed = load_seed(&config.database)?;
        storage.drop_and_seed(&seed).await?;
    }

    AppState::new(
        RootPath::new(&config.oauth.root_path),
        storage,
        metrics,
        session_key(config)?,
        config.secure_cookie(),
    )
}

/// Start serving on an already bound listener.
pub fn serve(state: AppState, listener: TcpListener) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(from_fn(track_requests))
            .wrap(state.session_middleware())
            .wrap(TracingLogger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub async fn run() -> std::io::Result<()> {
    // Install the subscriber first so config loading warnings are not lost.
    if let Err(e) = init_telemetry(SERVICE_NAME) {
        eprintln!("Failed to initialize telemetry: {e}");
    }

    let config = Config::default();

    tracing::info!(config = ?config.sanitized(), "starting account app");
    if let Err(e) = config.validate_for_production() {
        tracing::warn!("configuration is not production ready: {}", e);
    }

    let metrics = Metrics::new().map_err(std::io::Error::other)?;
    let state = build_state(&config, metrics)
        .await
        .map_err(std::io::Error::other)?;

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))?;
    tracing::info!(
        address = %listener.local_addr()?,
        root_path = %state.root(),
        "listening"
    );

    let result = serve(state, listener)?.await;
    shutdown_telemetry();
    result
}

/// Drop the configured database and load the seed fixture.
pub async fn seed() -> std::io::Result<()> {
    // Install the subscriber first so config loading warnings are not lost.
    if let Err(e) = init_telemetry(SERVICE_NAME) {
        eprintln!("Failed to initialize telemetry: {e}");
    }

    let config = Config::default();

    let seed = load_seed(&config.database).map_err(std::io::Error::other)?;
    let storage = create_storage(&config.database.url)
        .await
        .map_err(std::io::Error::other)?;
    storage
        .drop_and_seed(&seed)
        .await
        .map_err(std::io::Error::other)?;

    tracing::info!(users = seed.users.len(), "database dropped and seeded");
    shutdown_telemetry();
    Ok(())
}
