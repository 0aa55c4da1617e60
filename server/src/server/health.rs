//! Health check endpoints for the booking server.
//!
//! Provides endpoints for monitoring service health and readiness.

use super::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Health check endpoint.
///
/// Returns 200 OK if the service is running.
/// This is a simple liveness check - it doesn't inspect the store.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"ok","version":"0.1.0"}
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,
    /// Store status (`healthy` or `unhealthy`)
    pub store: String,
    /// Detail when not healthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Readiness check endpoint.
///
/// Returns 200 OK while the store accepts transactions and 503 once shutdown
/// has begun, so load balancers stop routing traffic.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/ready
/// # {"ready":true,"store":"healthy"}
/// ```
#[allow(clippy::unused_async)]
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let health = state.service.health();
    let ready = health.status.is_healthy();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready,
            store: health.status.to_string(),
            message: health.message,
        }),
    )
}
