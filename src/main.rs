//! event-explorer server entry point.
//!
//! Loads configuration, prepares the database, and serves the REST API.

use std::time::Duration;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use event_explorer::api;
use event_explorer::app_state::AppState;
use event_explorer::config::ExplorerConfig;
use event_explorer::persistence;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ExplorerConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&config)?;
    tracing::info!(addr = %config.listen_addr, "starting event-explorer");

    // Database
    let pool = persistence::connect(&config)
        .await
        .context("failed to connect to the database")?;
    if config.run_migrations {
        persistence::MIGRATOR
            .run(&pool)
            .await
            .context("failed to apply migrations")?;
        tracing::info!("migrations applied");
    }

    // Build application state
    let app_state = AppState::new(pool, &config)?;

    // Build router
    let app = api::apply_standard_layers(
        api::build_router(),
        Duration::from_secs(config.request_timeout_secs),
    )
    .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Installs the global subscriber: stdout always, plus a daily-rotated
/// file when `LOG_FILE` is set.
fn init_tracing(config: &ExplorerConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("event_explorer=info,tower_http=info"));

    let (file_layer, guard) = match config.log_file.as_deref() {
        Some(path) => {
            let path = std::path::Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .context("LOG_FILE must name a file")?;
            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);
    if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }
    Ok(guard)
}

/// Resolves on Ctrl-C so in-flight requests can finish.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
