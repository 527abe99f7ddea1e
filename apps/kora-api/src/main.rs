//! # Kora API Server
//!
//! HTTP server for recording sales.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kora API Server                                  │
//! │                                                                         │
//! │  POS client ───► HTTP (8080) ───► SaleEngine ───► SQLite               │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                               NotificationWorker                        │
//! │                               (stock alerts)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use kora_api::config::ApiConfig;
use kora_api::{build_router, AppState};
use kora_db::Database;
use kora_sales::{LoggingPushGateway, NotificationWorker, SaleEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("Starting Kora API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.http_port,
        database = %config.database_path.display(),
        "Configuration loaded"
    );

    // Open database (runs migrations)
    let db = Database::new(config.db_config()).await?;

    // Stock alert worker
    let engine_config = config.engine_config();
    let (queue, worker) = NotificationWorker::spawn(
        Arc::new(LoggingPushGateway),
        engine_config.notify_queue_capacity,
    );

    let engine = SaleEngine::new(db.clone(), Arc::new(queue), engine_config);
    let app = build_router(AppState::new(engine, db.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the engine's queue sender) is gone; drain alerts.
    worker.shutdown().await;
    db.close().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
