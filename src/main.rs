//! todo-backend server entry point.
//!
//! Connects to the store, provisions the default user and starts the Axum
//! HTTP server.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;

use todo_backend::api;
use todo_backend::app_state::AppState;
use todo_backend::config::{AppConfig, StorageBackend};
use todo_backend::persistence::{MemoryStore, PostgresStore, TodoStore, postgres};
use todo_backend::service::TodoService;
use todo_backend::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env().context("invalid configuration")?;
    telemetry::init(config.log_format);
    tracing::info!(addr = %config.listen_addr, storage = ?config.storage, "starting todo-backend");

    run(config).await
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    // Build persistence layer
    let store: Arc<dyn TodoStore> = match config.storage {
        StorageBackend::Postgres => {
            let options = config.database.connect_options()?;
            let pool = postgres::connect_with_retry(options, &config.database)
                .await
                .with_context(|| {
                    format!(
                        "failed to connect to database after {} attempts",
                        config.database.connect_attempts
                    )
                })?;
            postgres::run_migrations(&pool)
                .await
                .context("failed to run migrations")?;
            Arc::new(PostgresStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    // Build service layer
    let todo_service = TodoService::new(store, config.default_username.clone());
    todo_service
        .ensure_default_user()
        .await
        .context("failed to create initial user")?;

    // Build router
    let app = api::build_app(AppState::new(todo_service));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::warn!("received Ctrl+C, shutting down"),
        () = terminate => tracing::warn!("received SIGTERM, shutting down"),
    }
}
