//! Dropcode Server: short-code text and file sharing.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use dropcode_api::{AppState, build_router};
use dropcode_core::config::AppConfig;
use dropcode_core::error::AppError;
use dropcode_core::traits::SystemClock;
use dropcode_database::{DatabasePool, MemoryShareStore, ShareRepository, ShareStore};
use dropcode_worker::jobs::ReclaimJobHandler;
use dropcode_worker::{CronScheduler, JobExecutor};

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
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DROPCODE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
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

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Dropcode v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Row store ────────────────────────────────────────
    let (share_store, db_pool): (Arc<dyn ShareStore>, Option<DatabasePool>) =
        if config.database.is_memory() {
            tracing::warn!("Using in-memory share store; shares are lost on restart");
            (Arc::new(MemoryShareStore::new()), None)
        } else {
            let pool = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                dropcode_database::migration::run_migrations(pool.pool()).await?;
            }
            let repo = ShareRepository::new(pool.pool().clone());
            (Arc::new(repo), Some(pool))
        };

    // ── Step 2: Blob store ───────────────────────────────────────
    let blob_store =
        dropcode_storage::build_blob_store(&config.storage, config.server.base_url()).await?;

    // ── Step 3: Services and state ───────────────────────────────
    if config.reclaim.secret.is_none() {
        tracing::warn!("reclaim.secret is not set; POST /api/reclaim will fail closed");
    }
    let state = AppState::new(
        config.clone(),
        share_store,
        blob_store,
        Arc::new(SystemClock),
    );

    // ── Step 4: Scheduled reclamation ────────────────────────────
    let mut executor = JobExecutor::new();
    executor.register(Arc::new(ReclaimJobHandler::new(Arc::clone(
        &state.reclaim_service,
    ))));
    let scheduler = CronScheduler::new(Arc::new(executor)).await?;
    scheduler.register_default_tasks(&config.reclaim).await?;
    scheduler.start().await?;

    // ── Step 5: HTTP server ──────────────────────────────────────
    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(%addr, public_url = %config.server.base_url(), "Dropcode server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown");
        let _ = shutdown_tx.send(true);
    });
    let mut server_task = tokio::spawn(async move { server.await });

    // ── Step 6: Graceful shutdown ────────────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let served = tokio::select! {
        res = &mut server_task => res,
        _ = shutdown_rx.changed() => {
            match tokio::time::timeout(grace, &mut server_task).await {
                Ok(res) => res,
                Err(_) => {
                    tracing::warn!(
                        grace_seconds = grace.as_secs(),
                        "Grace period elapsed with requests in flight; aborting"
                    );
                    server_task.abort();
                    Ok(Ok(()))
                }
            }
        }
    };

    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!(error = %e, "Scheduler did not shut down cleanly");
    }
    if let Some(pool) = db_pool {
        pool.close().await;
    }

    match served {
        Ok(Ok(())) => {
            tracing::info!("Dropcode server shut down gracefully");
            Ok(())
        }
        Ok(Err(e)) => Err(AppError::internal(format!("Server error: {e}"))),
        Err(e) => Err(AppError::internal(format!("Server task failed: {e}"))),
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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
