//! Concert Booking Server
//!
//! Main server process that runs the booking HTTP API.
//!
//! This binary:
//! - Loads configuration from the environment (and `.env`)
//! - Installs the Prometheus recorder and serves `/metrics`
//! - Serves the booking API until Ctrl+C, then drains the store
//!
//! # Usage
//!
//! ```bash
//! PORT=8080 cargo run --bin server
//! ```

use axum::{Router, routing::get};
use concert_booking::{AppState, BookingService, Config, build_router};
use concert_booking_core::BookingEnvironment;
use concert_booking_runtime::metrics::MetricsServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,concert_booking=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Concert Booking Server...");

    let config = Config::from_env();
    tracing::info!(
        addr = %config.server_addr(),
        metrics_enabled = config.metrics.enabled,
        "Configuration loaded"
    );

    if config.metrics.enabled {
        start_metrics(&config).await?;
    }

    let service = BookingService::new(BookingEnvironment::production());
    let app = build_router(AppState::new(service.clone()));

    let listener = tokio::net::TcpListener::bind(config.server_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped, draining store...");
    if let Err(err) = service.shutdown(config.shutdown_timeout()).await {
        tracing::error!(error = %err, "Store did not drain cleanly");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Install the recorder and serve it on the metrics address.
async fn start_metrics(config: &Config) -> anyhow::Result<()> {
    let mut metrics = MetricsServer::new(config.metrics_addr());
    metrics.start()?;

    let Some(handle) = metrics.handle().cloned() else {
        return Ok(());
    };
    let router = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    let listener = tokio::net::TcpListener::bind(metrics.addr()).await?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            tracing::error!(error = %err, "Metrics server failed");
        }
    });
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
