//! Booking service: the typed facade handlers call.
//!
//! Every method validates its input first and then runs exactly one store
//! transaction (or one read), so a request never observes or leaves a
//! half-applied booking.

use concert_booking_core::{
    BookingEnvironment, BookingError, BookingState, BookingSummary, Concert, ConcertId,
    ConcertListing, ConflictReason, EntityKind, NewConcert, NewReservation, Reservation,
    ReservationId, ReservationLogEntry, UserId, validation::require_user_id,
};
use concert_booking_runtime::{
    HealthCheck, Store, StoreError,
    metrics::{ConcertMetrics, ReservationMetrics},
};
use concert_booking_web::AppError;
use std::time::Duration;
use thiserror::Error;

/// Errors from the booking service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The domain rejected the request
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// The store refused the transaction
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Booking(e) => e.into(),
            ServiceError::Store(e) => e.into(),
        }
    }
}

/// Result type alias for service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Concert listing together with the dashboard totals, read in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcertDashboard {
    /// Concerts and the sum of their seat counters
    pub listing: ConcertListing,
    /// Reservation totals
    pub summary: BookingSummary,
}

/// Typed facade over the booking store.
#[derive(Debug, Clone)]
pub struct BookingService {
    store: Store<BookingState, BookingEnvironment>,
}

impl BookingService {
    /// Service over an empty state.
    #[must_use]
    pub fn new(environment: BookingEnvironment) -> Self {
        Self::from_store(Store::new(BookingState::default(), environment))
    }

    /// Service over an existing store.
    #[must_use]
    pub const fn from_store(store: Store<BookingState, BookingEnvironment>) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &Store<BookingState, BookingEnvironment> {
        &self.store
    }

    /// Register a concert.
    ///
    /// # Errors
    ///
    /// Validation errors for blank text or fewer than one seat.
    pub async fn create_concert(&self, request: NewConcert) -> ServiceResult<Concert> {
        request.validate()?;
        let concert = self
            .store
            .transact(move |state, env| {
                state
                    .registry
                    .create(request.name, request.description, request.seat, env)
            })
            .await??;

        ConcertMetrics::record_created();
        Ok(concert)
    }

    /// All concerts in insertion order with the seat total.
    pub async fn list_concerts(&self) -> ConcertListing {
        self.store.state(|state| state.registry.find_all()).await
    }

    /// Listing and totals from the same state snapshot.
    pub async fn concert_dashboard(&self) -> ConcertDashboard {
        self.store
            .state(|state| ConcertDashboard {
                listing: state.registry.find_all(),
                summary: state.summary(),
            })
            .await
    }

    /// One concert by id.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown or malformed ids.
    pub async fn get_concert(&self, id: &str) -> ServiceResult<Concert> {
        let concert_id = parse_concert_id(id)?;
        let concert = self
            .store
            .state(|state| state.registry.find_one(&concert_id).cloned())
            .await?;
        Ok(concert)
    }

    /// Remove a concert that has no active reservations.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown or malformed ids, `Conflict` while seats are held.
    pub async fn remove_concert(&self, id: &str) -> ServiceResult<Concert> {
        let concert_id = parse_concert_id(id)?;
        let removed = self
            .store
            .transact(move |state, _env| {
                let active = state.ledger.active_count_for_concert(&concert_id);
                if active > 0 {
                    tracing::debug!(concert_id = %concert_id, active, "Refusing to remove reserved concert");
                    return Err(BookingError::from(
                        ConflictReason::ConcertHasActiveReservations {
                            concert_id: concert_id.to_string(),
                            active,
                        },
                    ));
                }
                state.registry.remove(&concert_id)
            })
            .await??;

        ConcertMetrics::record_removed();
        Ok(removed)
    }

    /// Reserve one seat for a user.
    ///
    /// # Errors
    ///
    /// `Validation` for blank fields, `NotFound` for unknown or malformed
    /// concert ids, `Conflict` when sold out or already reserved.
    pub async fn create_reservation(&self, request: NewReservation) -> ServiceResult<Reservation> {
        request.validate()?;
        let concert_id = parse_concert_id(&request.concert_id)?;
        let user_id = UserId::new(request.user_id);

        let result = self
            .store
            .transact(move |state, env| {
                let BookingState { registry, ledger } = state;
                ledger.create(registry, &concert_id, &user_id, env)
            })
            .await?;

        match result {
            Ok(reservation) => {
                ReservationMetrics::record_created();
                Ok(reservation)
            }
            Err(err) => {
                if let BookingError::Conflict(reason) = &err {
                    ReservationMetrics::record_rejected(reason.label());
                }
                Err(err.into())
            }
        }
    }

    /// Active reservations held by one user.
    pub async fn user_reservations(&self, user_id: &str) -> Vec<Reservation> {
        let user_id = UserId::new(user_id);
        self.store
            .state(|state| state.ledger.get_active_reservations_for_user(&user_id))
            .await
    }

    /// Every active reservation.
    pub async fn all_reservations(&self) -> Vec<Reservation> {
        self.store
            .state(|state| state.ledger.get_all_reservations().to_vec())
            .await
    }

    /// Number of cancellations recorded in the audit log.
    pub async fn cancelled_count(&self) -> usize {
        self.store
            .state(|state| state.ledger.get_cancelled_reservations())
            .await
    }

    /// Cancel a reservation owned by `user_id`.
    ///
    /// # Errors
    ///
    /// `Validation` when the user id is missing, `NotFoundForUser` when no
    /// active reservation with this id belongs to the user.
    pub async fn cancel_reservation(
        &self,
        reservation_id: &str,
        user_id: Option<&str>,
    ) -> ServiceResult<Reservation> {
        let user_id = require_user_id(user_id)?;
        let reservation_id: ReservationId =
            reservation_id
                .parse()
                .map_err(|_| BookingError::NotFoundForUser {
                    reservation_id: reservation_id.to_string(),
                })?;

        let cancelled = self
            .store
            .transact(move |state, env| {
                let BookingState { registry, ledger } = state;
                ledger.cancel_reservation(registry, &reservation_id, &user_id, env)
            })
            .await??;

        ReservationMetrics::record_cancelled();
        Ok(cancelled)
    }

    /// Audit log, newest first.
    pub async fn reservation_logs(&self) -> Vec<ReservationLogEntry> {
        self.store
            .state(|state| state.ledger.get_reservation_logs())
            .await
    }

    /// Dashboard totals.
    pub async fn summary(&self) -> BookingSummary {
        self.store.state(BookingState::summary).await
    }

    /// Health of the underlying store.
    #[must_use]
    pub fn health(&self) -> HealthCheck {
        self.store.health()
    }

    /// Stop accepting writes and wait for the in-flight one.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownTimeout`] if a transaction outlives `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> ServiceResult<()> {
        Ok(self.store.shutdown(timeout).await?)
    }
}

fn parse_concert_id(id: &str) -> Result<ConcertId, BookingError> {
    id.parse().map_err(|_| BookingError::NotFound {
        entity: EntityKind::Concert,
        id: id.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use concert_booking_core::LogAction;

    fn service() -> BookingService {
        BookingService::new(BookingEnvironment::production())
    }

    async fn concert(service: &BookingService, seats: i64) -> Concert {
        service
            .create_concert(NewConcert::new("Aurora", "Open air", seats))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_concert_validates_first() {
        let service = service();
        let err = service
            .create_concert(NewConcert::new("  ", "desc", 3))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Booking(BookingError::Validation { field: "name", .. })));
        assert!(service.list_concerts().await.concerts.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_ids_are_not_found() {
        let service = service();
        let err = service.get_concert("not-a-uuid").await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Booking(BookingError::concert_not_found("not-a-uuid"))
        );

        let err = service
            .create_reservation(NewReservation::new("nope", "u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Booking(BookingError::NotFound { .. })));

        let err = service
            .cancel_reservation("nope", Some("u1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Booking(BookingError::NotFoundForUser { .. })
        ));
    }

    #[tokio::test]
    async fn test_cancel_requires_user_id() {
        let service = service();
        let err = service.cancel_reservation("anything", None).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Booking(BookingError::Validation { field: "userId", .. })
        ));
    }

    #[tokio::test]
    async fn test_reserve_and_cancel_flow() {
        let service = service();
        let concert = concert(&service, 2).await;

        let reservation = service
            .create_reservation(NewReservation::new(concert.id.to_string(), "u1"))
            .await
            .unwrap();
        assert_eq!(service.get_concert(&concert.id.to_string()).await.unwrap().seat, 1);
        assert_eq!(service.user_reservations("u1").await.len(), 1);

        service
            .cancel_reservation(&reservation.id.to_string(), Some("u1"))
            .await
            .unwrap();

        assert_eq!(service.get_concert(&concert.id.to_string()).await.unwrap().seat, 2);
        assert!(service.all_reservations().await.is_empty());
        assert_eq!(service.cancelled_count().await, 1);
        let logs = service.reservation_logs().await;
        assert_eq!(logs[0].action, LogAction::Cancelled);
    }

    #[tokio::test]
    async fn test_remove_concert_refuses_while_reserved() {
        let service = service();
        let concert = concert(&service, 2).await;
        let id = concert.id.to_string();
        let reservation = service
            .create_reservation(NewReservation::new(id.clone(), "u1"))
            .await
            .unwrap();

        let err = service.remove_concert(&id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Booking(BookingError::Conflict(
                ConflictReason::ConcertHasActiveReservations { active: 1, .. }
            ))
        ));

        service
            .cancel_reservation(&reservation.id.to_string(), Some("u1"))
            .await
            .unwrap();
        let removed = service.remove_concert(&id).await.unwrap();
        assert_eq!(removed.id, concert.id);
        assert!(service.get_concert(&id).await.unwrap_err().to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_dashboard_is_one_snapshot() {
        let service = service();
        let concert = concert(&service, 3).await;
        service
            .create_reservation(NewReservation::new(concert.id.to_string(), "u1"))
            .await
            .unwrap();

        let dashboard = service.concert_dashboard().await;
        assert_eq!(dashboard.listing.total_seats, 2);
        assert_eq!(dashboard.summary.total_seats, 2);
        assert_eq!(dashboard.summary.total_reservations, 1);
        assert_eq!(dashboard.summary.total_cancelled_reservations, 0);
        assert_eq!(service.summary().await, dashboard.summary);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_writes_but_serves_reads() {
        let service = service();
        concert(&service, 1).await;

        service.shutdown(Duration::from_secs(1)).await.unwrap();

        let err = service
            .create_concert(NewConcert::new("Late", "show", 1))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Store(StoreError::ShutdownInProgress));
        assert_eq!(service.list_concerts().await.concerts.len(), 1);
        assert!(service.health().status.is_unhealthy());
    }
}
