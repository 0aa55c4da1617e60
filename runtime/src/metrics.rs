//! Prometheus metrics for observability and monitoring.
//!
//! This module provides metric collection for:
//! - Store transactions
//! - Concert lifecycle (created, removed)
//! - Reservations (created, cancelled, rejected by reason)
//!
//! # Example
//!
//! ```rust,no_run
//! use concert_booking_runtime::metrics::MetricsServer;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start()?;
//!
//! // Rendered text for a `/metrics` endpoint
//! let body = server.render();
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus metrics recorder and its scrape address.
///
/// Installs the global recorder; the binary serves [`MetricsServer::render`]
/// on `addr` for Prometheus scraping.
pub struct MetricsServer {
    addr: SocketAddr,
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Create a new metrics server.
    ///
    /// # Arguments
    ///
    /// * `addr` - Socket address to serve on (e.g., `0.0.0.0:9090`)
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self { addr, handle: None }
    }

    /// Scrape address.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Register metric descriptions and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a recorder is already installed (e.g., in tests), this logs a
    /// warning and leaves [`MetricsServer::handle`] empty.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.000_01, 0.000_05, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                register_metrics();
                self.handle = Some(handle);
                tracing::info!(
                    addr = %self.addr,
                    "Metrics recorder installed - scrape at http://{}/metrics",
                    self.addr
                );
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if the recorder hasn't been installed by this server.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Store Metrics
    describe_counter!(
        "store.transactions.total",
        "Total number of state transactions run by the store"
    );
    describe_histogram!(
        "store.transaction.duration_seconds",
        "Time spent holding the state write lock"
    );
    describe_counter!(
        "store.shutdown.rejected_transactions",
        "Transactions rejected because the store is shutting down"
    );

    // Concert Metrics
    describe_counter!("booking_concerts_created_total", "Total number of concerts created");
    describe_counter!("booking_concerts_removed_total", "Total number of concerts removed");

    // Reservation Metrics
    describe_counter!(
        "booking_reservations_created_total",
        "Total number of reservations created"
    );
    describe_counter!(
        "booking_reservations_cancelled_total",
        "Total number of reservations cancelled"
    );
    describe_counter!(
        "booking_reservations_rejected_total",
        "Total number of reservation attempts rejected, labelled by reason"
    );

    tracing::info!("Booking metrics registered");
}

/// Concert lifecycle metrics recorder.
pub struct ConcertMetrics;

impl ConcertMetrics {
    /// Record a concert created.
    pub fn record_created() {
        counter!("booking_concerts_created_total").increment(1);
    }

    /// Record a concert removed.
    pub fn record_removed() {
        counter!("booking_concerts_removed_total").increment(1);
    }
}

/// Reservation metrics recorder.
pub struct ReservationMetrics;

impl ReservationMetrics {
    /// Record a reservation created.
    pub fn record_created() {
        counter!("booking_reservations_created_total").increment(1);
    }

    /// Record a reservation cancelled.
    pub fn record_cancelled() {
        counter!("booking_reservations_cancelled_total").increment(1);
    }

    /// Record a rejected reservation attempt.
    ///
    /// # Arguments
    ///
    /// * `reason` - Rejection reason (e.g., `"no_available_seats"`, `"already_reserved"`)
    pub fn record_rejected(reason: &'static str) {
        counter!("booking_reservations_rejected_total", "reason" => reason).increment(1);
        tracing::debug!(reason, "Recorded reservation_rejected metric");
    }
}
