//! Reservation Ledger.
//!
//! Owns the set of active reservations and the append-only audit log, and
//! enforces the booking rules by calling into the [`ConcertRegistry`]:
//!
//! - a seat is only taken while the concert's counter is above zero
//! - a user holds at most one active reservation per concert
//! - every reservation and cancellation is recorded in the audit log
//!
//! The ledger never keeps a reference to a concert; it re-fetches by id on
//! every operation.
//!
//! Operations are multi-step and not atomic on their own. The runtime store
//! runs each of them under one write lock over the whole [`crate::BookingState`].

use crate::environment::BookingEnvironment;
use crate::error::{BookingError, BookingResult, ConflictReason};
use crate::registry::ConcertRegistry;
use crate::types::{
    ConcertId, LogAction, LogEntryId, Reservation, ReservationId, ReservationLogEntry, UserId,
};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Message returned to callers after a successful cancellation.
pub const CANCELLED_MESSAGE: &str = "Reservation successfully cancelled.";

/// Active reservations plus the audit history.
#[derive(Debug, Clone, Default)]
pub struct ReservationLedger {
    active: Vec<Reservation>,
    /// Newest first: entries are prepended, never sorted on insert.
    logs: VecDeque<ReservationLogEntry>,
}

impl ReservationLedger {
    /// Creates an empty ledger
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active: Vec::new(),
            logs: VecDeque::new(),
        }
    }

    /// Reserve one seat of `concert_id` for `user_id`.
    ///
    /// The seat is taken before the duplicate check runs, so a rejected
    /// duplicate booking still consumes a seat. This ordering is existing
    /// behavior and is kept as is; it is most likely a defect.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] if the concert does not exist
    /// - [`ConflictReason::NoAvailableSeats`] if the seat counter is at or below zero
    ///   (nothing is mutated)
    /// - [`ConflictReason::AlreadyReserved`] if the user already holds an active
    ///   reservation for this concert (one seat has been consumed)
    pub fn create(
        &mut self,
        registry: &mut ConcertRegistry,
        concert_id: &ConcertId,
        user_id: &UserId,
        env: &BookingEnvironment,
    ) -> BookingResult<Reservation> {
        let concert = registry.find_one(concert_id)?;

        if concert.seat <= 0 {
            tracing::debug!(concert_id = %concert_id, user_id = %user_id, "No available seats");
            return Err(ConflictReason::NoAvailableSeats {
                concert_id: concert_id.to_string(),
            }
            .into());
        }
        let concert_name = concert.name.clone();

        registry.decrease_seats(concert_id)?;

        if self.find_active(concert_id, user_id).is_some() {
            tracing::debug!(
                concert_id = %concert_id,
                user_id = %user_id,
                "Duplicate reservation rejected after seat was taken"
            );
            return Err(ConflictReason::AlreadyReserved {
                user_id: user_id.to_string(),
                concert_id: concert_id.to_string(),
            }
            .into());
        }

        let reservation = Reservation {
            id: ReservationId::from_uuid(env.ids.next_uuid()),
            concert_id: *concert_id,
            user_id: user_id.clone(),
            created_at: env.clock.now(),
        };
        self.active.push(reservation.clone());
        self.record(
            env,
            &reservation,
            concert_name,
            LogAction::Reserved,
            reservation.created_at,
        );

        tracing::info!(
            reservation_id = %reservation.id,
            concert_id = %concert_id,
            user_id = %user_id,
            "Seat reserved"
        );
        Ok(reservation)
    }

    /// Active reservations held by `user_id`, in stored order.
    #[must_use]
    pub fn get_active_reservations_for_user(&self, user_id: &UserId) -> Vec<Reservation> {
        self.active
            .iter()
            .filter(|r| r.user_id == *user_id)
            .cloned()
            .collect()
    }

    /// Every active reservation.
    #[must_use]
    pub fn get_all_reservations(&self) -> &[Reservation] {
        &self.active
    }

    /// Number of cancellations recorded in the audit log.
    #[must_use]
    pub fn get_cancelled_reservations(&self) -> usize {
        self.logs
            .iter()
            .filter(|entry| entry.action == LogAction::Cancelled)
            .count()
    }

    /// Cancel the active reservation `reservation_id` owned by `user_id`.
    ///
    /// Returns the reservation that was removed from the active set.
    ///
    /// If the concert has been removed from the registry since booking, the
    /// lookup fails and the reservation stays active with no seat given back.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFoundForUser`] if no active reservation with this id
    ///   belongs to `user_id` (including ids that belong to someone else)
    /// - [`BookingError::NotFound`] if the reservation's concert no longer exists
    pub fn cancel_reservation(
        &mut self,
        registry: &mut ConcertRegistry,
        reservation_id: &ReservationId,
        user_id: &UserId,
        env: &BookingEnvironment,
    ) -> BookingResult<Reservation> {
        let index = self
            .active
            .iter()
            .position(|r| r.id == *reservation_id && r.user_id == *user_id)
            .ok_or_else(|| BookingError::NotFoundForUser {
                reservation_id: reservation_id.to_string(),
            })?;

        let concert_id = self.active[index].concert_id;
        let concert_name = registry.find_one(&concert_id)?.name.clone();

        registry.increase_seats(&concert_id)?;
        let cancelled = self.active.remove(index);
        self.record(
            env,
            &cancelled,
            concert_name,
            LogAction::Cancelled,
            env.clock.now(),
        );

        tracing::info!(
            reservation_id = %cancelled.id,
            concert_id = %concert_id,
            user_id = %user_id,
            "Reservation cancelled"
        );
        Ok(cancelled)
    }

    /// Audit log, newest timestamp first.
    ///
    /// Entries sharing a timestamp keep reverse insertion order: the stored
    /// sequence is newest first and the sort is stable.
    #[must_use]
    pub fn get_reservation_logs(&self) -> Vec<ReservationLogEntry> {
        let mut logs: Vec<_> = self.logs.iter().cloned().collect();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs
    }

    /// Number of active reservations for one concert.
    #[must_use]
    pub fn active_count_for_concert(&self, concert_id: &ConcertId) -> usize {
        self.active
            .iter()
            .filter(|r| r.concert_id == *concert_id)
            .count()
    }

    fn find_active(&self, concert_id: &ConcertId, user_id: &UserId) -> Option<&Reservation> {
        self.active
            .iter()
            .find(|r| r.concert_id == *concert_id && r.user_id == *user_id)
    }

    fn record(
        &mut self,
        env: &BookingEnvironment,
        reservation: &Reservation,
        concert_name: String,
        action: LogAction,
        timestamp: DateTime<Utc>,
    ) {
        self.logs.push_front(ReservationLogEntry {
            id: LogEntryId::from_uuid(env.ids.next_uuid()),
            user_id: reservation.user_id.clone(),
            user_name: reservation.user_id.to_string(),
            concert_id: reservation.concert_id,
            concert_name,
            action,
            timestamp,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn setup(seats: i64) -> (ConcertRegistry, ReservationLedger, ConcertId, BookingEnvironment) {
        let env = BookingEnvironment::production();
        let mut registry = ConcertRegistry::new();
        let concert = registry.create("Symphony", "Opening night", seats, &env).unwrap();
        (registry, ReservationLedger::new(), concert.id, env)
    }

    fn seat(registry: &ConcertRegistry, id: &ConcertId) -> i64 {
        registry.find_one(id).unwrap().seat
    }

    #[test]
    fn test_reserve_takes_a_seat_and_logs() {
        let (mut registry, mut ledger, id, env) = setup(3);
        let user = UserId::new("u1");

        let reservation = ledger.create(&mut registry, &id, &user, &env).unwrap();

        assert_eq!(reservation.concert_id, id);
        assert_eq!(reservation.user_id, user);
        assert_eq!(seat(&registry, &id), 2);
        assert_eq!(ledger.get_all_reservations().len(), 1);

        let logs = ledger.get_reservation_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, LogAction::Reserved);
        assert_eq!(logs[0].concert_name, "Symphony");
        assert_eq!(logs[0].user_name, "u1");
        assert_eq!(logs[0].timestamp, reservation.created_at);
    }

    #[test]
    fn test_unknown_concert_propagates_not_found() {
        let (mut registry, mut ledger, _, env) = setup(1);
        let missing = ConcertId::from_uuid(uuid::Uuid::new_v4());
        let err = ledger
            .create(&mut registry, &missing, &UserId::new("u1"), &env)
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(ledger.get_reservation_logs().is_empty());
    }

    #[test]
    fn test_sold_out_rejects_without_mutation() {
        let (mut registry, mut ledger, id, env) = setup(1);
        ledger.create(&mut registry, &id, &UserId::new("a"), &env).unwrap();

        let err = ledger
            .create(&mut registry, &id, &UserId::new("b"), &env)
            .unwrap_err();

        assert!(matches!(
            err,
            BookingError::Conflict(ConflictReason::NoAvailableSeats { .. })
        ));
        assert_eq!(seat(&registry, &id), 0);
        assert_eq!(ledger.get_all_reservations().len(), 1);
        assert_eq!(ledger.get_reservation_logs().len(), 1);
    }

    #[test]
    fn test_duplicate_reservation_consumes_a_seat() {
        // Documents existing behavior, not desired behavior.
        let (mut registry, mut ledger, id, env) = setup(3);
        let user = UserId::new("u1");
        ledger.create(&mut registry, &id, &user, &env).unwrap();

        let err = ledger.create(&mut registry, &id, &user, &env).unwrap_err();

        assert!(matches!(
            err,
            BookingError::Conflict(ConflictReason::AlreadyReserved { .. })
        ));
        assert_eq!(seat(&registry, &id), 1);
        assert_eq!(ledger.active_count_for_concert(&id), 1);
        assert_eq!(ledger.get_reservation_logs().len(), 1);
    }

    #[test]
    fn test_cancel_restores_seat() {
        let (mut registry, mut ledger, id, env) = setup(2);
        let user = UserId::new("u1");
        let reservation = ledger.create(&mut registry, &id, &user, &env).unwrap();

        let cancelled = ledger
            .cancel_reservation(&mut registry, &reservation.id, &user, &env)
            .unwrap();

        assert_eq!(cancelled, reservation);
        assert_eq!(seat(&registry, &id), 2);
        assert!(ledger.get_all_reservations().is_empty());
        assert_eq!(ledger.get_cancelled_reservations(), 1);
    }

    #[test]
    fn test_cancel_by_other_user_is_not_found() {
        let (mut registry, mut ledger, id, env) = setup(2);
        let reservation = ledger
            .create(&mut registry, &id, &UserId::new("owner"), &env)
            .unwrap();

        let err = ledger
            .cancel_reservation(&mut registry, &reservation.id, &UserId::new("intruder"), &env)
            .unwrap_err();

        assert!(matches!(err, BookingError::NotFoundForUser { .. }));
        assert_eq!(seat(&registry, &id), 1);
        assert_eq!(ledger.get_all_reservations().len(), 1);
    }

    #[test]
    fn test_cancel_after_concert_removed_leaves_reservation_active() {
        let (mut registry, mut ledger, id, env) = setup(2);
        let user = UserId::new("u1");
        let reservation = ledger.create(&mut registry, &id, &user, &env).unwrap();
        registry.remove(&id).unwrap();

        let err = ledger
            .cancel_reservation(&mut registry, &reservation.id, &user, &env)
            .unwrap_err();

        assert!(matches!(err, BookingError::NotFound { .. }));
        assert_eq!(ledger.get_all_reservations().len(), 1);
        assert_eq!(ledger.get_cancelled_reservations(), 0);
    }

    #[test]
    fn test_rebooking_after_cancel_gets_new_id() {
        let (mut registry, mut ledger, id, env) = setup(1);
        let user = UserId::new("u1");
        let first = ledger.create(&mut registry, &id, &user, &env).unwrap();
        ledger
            .cancel_reservation(&mut registry, &first.id, &user, &env)
            .unwrap();

        let second = ledger.create(&mut registry, &id, &user, &env).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(seat(&registry, &id), 0);
    }

    #[test]
    fn test_user_filter() {
        let (mut registry, mut ledger, id, env) = setup(5);
        ledger.create(&mut registry, &id, &UserId::new("a"), &env).unwrap();
        ledger.create(&mut registry, &id, &UserId::new("b"), &env).unwrap();

        let mine = ledger.get_active_reservations_for_user(&UserId::new("a"));
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id, UserId::new("a"));
        assert!(ledger
            .get_active_reservations_for_user(&UserId::new("nobody"))
            .is_empty());
    }
}
