//! Concert API endpoints.
//!
//! - POST /concerts - Create a concert
//! - GET /concerts - List concerts with dashboard totals
//! - GET /concerts/:id - Get one concert
//! - DELETE /concerts/:id - Remove a concert without active reservations

use super::Envelope;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use concert_booking_core::{Concert, NewConcert};
use concert_booking_web::{CorrelationId, JsonBody, WebResult};
use serde::Serialize;

/// Concert listing with the dashboard totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcertsPayload {
    /// Concerts in creation order
    pub list: Vec<Concert>,
    /// Sum of the remaining seats
    pub total_seats: i64,
    /// Number of active reservations
    pub total_reservations: usize,
    /// Number of cancellations recorded
    pub total_cancelled_reservations: usize,
}

/// Create a concert.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/concerts \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Aurora", "description": "Open air", "seat": 100}'
/// ```
///
/// # Errors
///
/// 400 when the body is not a concert, a field is blank or `seat` is out
/// of range.
pub async fn create_concert(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    JsonBody(request): JsonBody<NewConcert>,
) -> WebResult<(StatusCode, Json<Concert>)> {
    tracing::debug!(%correlation_id, name = %request.name, "Creating concert");
    let concert = state.service.create_concert(request).await?;
    Ok((StatusCode::CREATED, Json(concert)))
}

/// List concerts.
///
/// ```bash
/// curl http://localhost:8080/concerts
/// # {"data":{"list":[...],"totalSeats":99,"totalReservations":1,"totalCancelledReservations":0},"success":true}
/// ```
pub async fn list_concerts(State(state): State<AppState>) -> Json<Envelope<ConcertsPayload>> {
    let dashboard = state.service.concert_dashboard().await;
    Json(Envelope::ok(ConcertsPayload {
        list: dashboard.listing.concerts,
        total_seats: dashboard.listing.total_seats,
        total_reservations: dashboard.summary.total_reservations,
        total_cancelled_reservations: dashboard.summary.total_cancelled_reservations,
    }))
}

/// Get one concert.
///
/// # Errors
///
/// 404 for unknown or malformed ids.
pub async fn get_concert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<Envelope<Concert>>> {
    let concert = state.service.get_concert(&id).await?;
    Ok(Json(Envelope::ok(concert)))
}

/// Remove a concert.
///
/// # Errors
///
/// 404 for unknown ids, 409 while the concert has active reservations.
pub async fn delete_concert(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    Path(id): Path<String>,
) -> WebResult<Json<Envelope<Concert>>> {
    tracing::debug!(%correlation_id, concert_id = %id, "Removing concert");
    let concert = state.service.remove_concert(&id).await?;
    Ok(Json(Envelope::ok(concert)))
}
