//! Domain types for concert booking.
//!
//! Identifiers, concert and reservation records, audit log entries, and the
//! read models returned by listing queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a concert
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConcertId(Uuid);

impl ConcertId {
    /// Create a `ConcertId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ConcertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConcertId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Unique identifier for a reservation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Create a `ReservationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReservationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Unique identifier for an audit log entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogEntryId(Uuid);

impl LogEntryId {
    /// Create a `LogEntryId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for LogEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque user identity.
///
/// Not checked against any user store; the booking core only compares it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Wrap a user identity string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identity string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Records
// ============================================================================

/// A bookable concert and its seat counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concert {
    /// Stable identifier, generated on creation
    pub id: ConcertId,
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Seats currently available.
    ///
    /// Signed: a rejected duplicate booking still consumes a seat, which can
    /// drive this to -1 on a sold-out concert.
    pub seat: i64,
    /// Seat count the concert was created with
    pub capacity: i64,
}

/// A single-seat booking linking one user to one concert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Reservation identifier
    pub id: ReservationId,
    /// Concert the seat belongs to
    pub concert_id: ConcertId,
    /// User holding the seat
    pub user_id: UserId,
    /// When the reservation was made
    pub created_at: DateTime<Utc>,
}

/// Kind of action recorded in the audit log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    /// A seat was reserved
    Reserved,
    /// An active reservation was cancelled
    Cancelled,
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reserved => write!(f, "reserved"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Immutable audit record of a reserve or cancel action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationLogEntry {
    /// Entry identifier
    pub id: LogEntryId,
    /// Acting user
    pub user_id: UserId,
    /// Display name of the acting user (the id itself, no user store exists)
    pub user_name: String,
    /// Concert the action applied to
    pub concert_id: ConcertId,
    /// Concert name at the time of the action
    pub concert_name: String,
    /// What happened
    pub action: LogAction,
    /// When it happened
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Read models
// ============================================================================

/// Result of listing every concert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcertListing {
    /// Concerts in insertion order
    pub concerts: Vec<Concert>,
    /// Sum of the current seat counters
    pub total_seats: i64,
}

/// Totals shown alongside the concert list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    /// Sum of available seats across all concerts
    pub total_seats: i64,
    /// Number of active reservations
    pub total_reservations: usize,
    /// Number of cancellations recorded in the audit log
    pub total_cancelled_reservations: usize,
}
