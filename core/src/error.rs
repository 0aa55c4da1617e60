//! Error types for registry and ledger operations.
//!
//! Every failure is a deterministic function of current state and input, so
//! nothing here is retried internally. Callers decide how to surface each kind.

use std::fmt;
use thiserror::Error;

/// Result type alias for booking operations.
pub type BookingResult<T> = Result<T, BookingError>;

/// Kind of entity a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A concert record
    Concert,
    /// An active reservation
    Reservation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concert => write!(f, "Concert"),
            Self::Reservation => write!(f, "Reservation"),
        }
    }
}

/// Business-rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictReason {
    /// The concert's seat counter is at or below zero
    #[error("Concert with ID \"{concert_id}\" has no available seats.")]
    NoAvailableSeats {
        /// Concert that is sold out
        concert_id: String,
    },

    /// The user already holds an active reservation for the concert
    #[error("User \"{user_id}\" has already reserved a seat for concert \"{concert_id}\".")]
    AlreadyReserved {
        /// User attempting the duplicate booking
        user_id: String,
        /// Concert already reserved
        concert_id: String,
    },

    /// A concert cannot be removed while seats are held against it
    #[error("Concert with ID \"{concert_id}\" still has {active} active reservation(s).")]
    ConcertHasActiveReservations {
        /// Concert targeted for removal
        concert_id: String,
        /// Number of active reservations blocking removal
        active: usize,
    },
}

impl ConflictReason {
    /// Stable label for metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NoAvailableSeats { .. } => "no_available_seats",
            Self::AlreadyReserved { .. } => "already_reserved",
            Self::ConcertHasActiveReservations { .. } => "concert_has_active_reservations",
        }
    }
}

/// Errors returned by booking operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// Requested entity does not exist
    #[error("{entity} with ID \"{id}\" not found.")]
    NotFound {
        /// Kind of entity looked up
        entity: EntityKind,
        /// Identifier as supplied by the caller
        id: String,
    },

    /// No active reservation with this id belongs to the requesting user.
    ///
    /// Deliberately indistinguishable from a nonexistent id.
    #[error("Active reservation with ID \"{reservation_id}\" not found for this user.")]
    NotFoundForUser {
        /// Reservation id supplied by the caller
        reservation_id: String,
    },

    /// Business-rule violation
    #[error(transparent)]
    Conflict(#[from] ConflictReason),

    /// Malformed creation input
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Offending input field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl BookingError {
    /// Concert lookup failure.
    #[must_use]
    pub fn concert_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: EntityKind::Concert,
            id: id.to_string(),
        }
    }

    /// Validation failure on `field`.
    #[must_use]
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Check if this is a not-found error
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotFoundForUser { .. })
    }

    /// Check if this is a conflict
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Check if this is a validation error
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
