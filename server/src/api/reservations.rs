//! Reservation API endpoints.
//!
//! - POST /reservations - Reserve a seat
//! - GET /reservations/all - Every active reservation
//! - GET /reservations/cancelled - Number of cancellations
//! - GET /reservations/logs - Audit log, newest first
//! - GET /reservations/:userId - Active reservations of one user
//! - DELETE /reservations/:id?userId=.. - Cancel a reservation
//!
//! The literal segments `all`, `cancelled` and `logs` take precedence over
//! `:userId`.

use super::{CountResponse, Envelope, ListPayload, MessageResponse};
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use concert_booking_core::{
    NewReservation, Reservation, ReservationLogEntry, ledger::CANCELLED_MESSAGE,
};
use concert_booking_web::{CorrelationId, JsonBody, WebResult};
use serde::Deserialize;

/// Query parameters for cancellation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelQuery {
    /// User that owns the reservation
    pub user_id: Option<String>,
}

/// Reserve a seat.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/reservations \
///   -H "Content-Type: application/json" \
///   -d '{"concertId": "<uuid>", "userId": "u1"}'
/// ```
///
/// # Errors
///
/// 400 for blank fields, 404 for unknown concerts, 409 when sold out or
/// already reserved.
pub async fn create_reservation(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    JsonBody(request): JsonBody<NewReservation>,
) -> WebResult<(StatusCode, Json<Reservation>)> {
    tracing::debug!(
        %correlation_id,
        concert_id = %request.concert_id,
        user_id = %request.user_id,
        "Creating reservation"
    );
    let reservation = state.service.create_reservation(request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Every active reservation.
pub async fn all_reservations(
    State(state): State<AppState>,
) -> Json<Envelope<ListPayload<Reservation>>> {
    let list = state.service.all_reservations().await;
    Json(Envelope::ok(list.into()))
}

/// Number of cancellations ever recorded.
pub async fn cancelled_reservations(State(state): State<AppState>) -> Json<CountResponse> {
    Json(CountResponse {
        total: state.service.cancelled_count().await,
        success: true,
    })
}

/// Audit log, newest first.
pub async fn reservation_logs(
    State(state): State<AppState>,
) -> Json<Envelope<Vec<ReservationLogEntry>>> {
    Json(Envelope::ok(state.service.reservation_logs().await))
}

/// Active reservations of one user.
pub async fn user_reservations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Envelope<ListPayload<Reservation>>> {
    let list = state.service.user_reservations(&user_id).await;
    Json(Envelope::ok(list.into()))
}

/// Cancel a reservation.
///
/// ```bash
/// curl -X DELETE "http://localhost:8080/reservations/<uuid>?userId=u1"
/// # {"message":"Reservation successfully cancelled."}
/// ```
///
/// # Errors
///
/// 400 without `userId`, 404 when the user holds no active reservation
/// with this id.
pub async fn cancel_reservation(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    Path(id): Path<String>,
    Query(query): Query<CancelQuery>,
) -> WebResult<Json<MessageResponse>> {
    tracing::debug!(%correlation_id, reservation_id = %id, "Cancelling reservation");
    state
        .service
        .cancel_reservation(&id, query.user_id.as_deref())
        .await?;
    Ok(Json(MessageResponse {
        message: CANCELLED_MESSAGE.to_string(),
    }))
}
