//! Router configuration for the booking server.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::{health_check, readiness_check};
use super::state::AppState;
use crate::api::{concerts, reservations};
use axum::{
    Router,
    routing::{get, post},
};
use concert_booking_web::correlation_id_layer;
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Configures all routes including:
/// - Health checks
/// - Concert endpoints
/// - Reservation endpoints
///
/// Requests are traced inside the correlation span, and every response
/// carries an `X-Correlation-ID` header.
pub fn build_router(state: AppState) -> Router {
    let concert_routes = Router::new()
        .route(
            "/concerts",
            post(concerts::create_concert).get(concerts::list_concerts),
        )
        .route(
            "/concerts/:id",
            get(concerts::get_concert).delete(concerts::delete_concert),
        );

    let reservation_routes = Router::new()
        .route("/reservations", post(reservations::create_reservation))
        .route("/reservations/all", get(reservations::all_reservations))
        .route(
            "/reservations/cancelled",
            get(reservations::cancelled_reservations),
        )
        .route("/reservations/logs", get(reservations::reservation_logs))
        .route(
            "/reservations/:id",
            get(reservations::user_reservations).delete(reservations::cancel_reservation),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .merge(concert_routes)
        .merge(reservation_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
