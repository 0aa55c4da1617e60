//! # Concert Booking Core
//!
//! Seat accounting and reservation lifecycle for the concert booking service.
//!
//! This crate holds the only part of the system with real invariants:
//!
//! - **Concert Registry**: owns concert records and their seat counters
//! - **Reservation Ledger**: owns active reservations and the append-only audit log,
//!   and is the only caller that mutates seat counts on behalf of bookings
//!
//! Both components are plain owned data. Neither takes a lock; the runtime `Store`
//! serializes every mutating operation over a single [`BookingState`], which is what
//! makes the multi-step ledger operations atomic.
//!
//! ## Example
//!
//! ```
//! use concert_booking_core::{BookingEnvironment, BookingState, UserId};
//!
//! let env = BookingEnvironment::production();
//! let mut state = BookingState::default();
//!
//! let concert = state
//!     .registry
//!     .create("Night Shift", "Late show", 2, &env)
//!     .map_err(|e| e.to_string())?;
//!
//! let BookingState { registry, ledger } = &mut state;
//! ledger
//!     .create(registry, &concert.id, &UserId::new("u1"), &env)
//!     .map_err(|e| e.to_string())?;
//!
//! assert_eq!(state.registry.find_one(&concert.id).map(|c| c.seat), Ok(1));
//! # Ok::<(), String>(())
//! ```

pub mod environment;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod types;
pub mod validation;

pub use environment::{BookingEnvironment, Clock, IdGenerator, SystemClock, UuidGenerator};
pub use error::{BookingError, BookingResult, ConflictReason, EntityKind};
pub use ledger::ReservationLedger;
pub use registry::ConcertRegistry;
pub use types::{
    BookingSummary, Concert, ConcertId, ConcertListing, LogAction, LogEntryId, Reservation,
    ReservationId, ReservationLogEntry, UserId,
};
pub use validation::{MAX_SEATS, NewConcert, NewReservation};

/// Complete in-memory state of the booking domain.
///
/// The registry and the ledger live side by side so a single write lock can
/// cover a whole reserve or cancel sequence.
#[derive(Debug, Clone, Default)]
pub struct BookingState {
    /// Concert records and seat counters
    pub registry: ConcertRegistry,
    /// Active reservations and the audit log
    pub ledger: ReservationLedger,
}

impl BookingState {
    /// Dashboard totals across both components.
    #[must_use]
    pub fn summary(&self) -> BookingSummary {
        BookingSummary {
            total_seats: self.registry.find_all().total_seats,
            total_reservations: self.ledger.get_all_reservations().len(),
            total_cancelled_reservations: self.ledger.get_cancelled_reservations(),
        }
    }
}
