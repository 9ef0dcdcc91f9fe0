//! deskfs session daemon.
//!
//! Opens a session against the configured backend, keeps the tree index and
//! comments in sync in the background, and flushes everything on shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::{EnvFilter, fmt};

use deskfs_core::config::AppConfig;
use deskfs_core::error::AppError;
use deskfs_core::events::{DomainEvent, EventBus, EventPayload, SyncEvent};
use deskfs_entity::id::ItemId;
use deskfs_service::{ListingOutcome, SessionContext};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Session error");
        std::process::exit(1);
    }
}

/// Load configuration from an explicit file or the layered defaults
fn load_configuration() -> Result<AppConfig, AppError> {
    match std::env::var("DESKFS_CONFIG") {
        Ok(path) => AppConfig::load_file(&path),
        Err(_) => {
            let env = std::env::var("DESKFS_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main session run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting deskfs v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Local cache ──────────────────────────────────────
    if config.cache.provider == "file" {
        tokio::fs::create_dir_all(&config.cache.directory)
            .await
            .map_err(|e| {
                AppError::storage(format!(
                    "Failed to create cache dir '{}': {e}",
                    config.cache.directory
                ))
            })?;
    }
    tracing::info!(provider = %config.cache.provider, "Initializing cache...");
    let cache = deskfs_cache::CacheManager::new(&config.cache).await?;

    // ── Step 2: Remote directory ─────────────────────────────────
    tracing::info!(provider = %config.remote.provider, "Connecting remote directory...");
    let remote = deskfs_remote::connect(&config.remote)?;

    // ── Step 3: Event log ────────────────────────────────────────
    let bus = EventBus::default();
    let event_log = tokio::spawn(log_events(bus.subscribe()));

    // ── Step 4: Open session ─────────────────────────────────────
    let session = SessionContext::open_with_bus(config, remote, Arc::new(cache), bus.clone()).await?;

    // ── Step 5: Warm root listing ────────────────────────────────
    match session.navigate(&ItemId::root()).await? {
        ListingOutcome::Loaded { count } => tracing::info!(count, "Root folder loaded"),
        ListingOutcome::KeptStale { message } => {
            tracing::warn!(error = %message, "Root folder unavailable, serving cache")
        }
        ListingOutcome::Discarded => {}
    }

    tracing::info!("deskfs session ready");

    // ── Step 6: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, flushing documents...");

    let closed = session.close().await;
    drop(bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), event_log).await;

    closed?;
    tracing::info!("deskfs session shut down gracefully");
    Ok(())
}

/// Mirror operation and sync events into the log
async fn log_events(mut events: broadcast::Receiver<DomainEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => match event.payload {
                EventPayload::Operation(op) => tracing::info!(event = ?op, "Operation"),
                EventPayload::Sync(SyncEvent::FlushFailed { document, message }) => {
                    tracing::warn!(%document, error = %message, "Document not saved")
                }
                EventPayload::Sync(SyncEvent::PhaseChanged { document, phase }) => {
                    tracing::debug!(%document, ?phase, "Sync phase changed")
                }
            },
            Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "Event log fell behind"),
            Err(RecvError::Closed) => break,
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
