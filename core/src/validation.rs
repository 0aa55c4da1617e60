//! Input validation for the transport boundary.
//!
//! Requests are validated here before the registry or ledger is touched, so a
//! `Validation` error never leaves partial state behind.

use crate::error::{BookingError, BookingResult};
use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// Largest seat count a concert may be created with (`u32::MAX`).
pub const MAX_SEATS: i64 = 4_294_967_295;

/// Request to create a concert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewConcert {
    /// Concert name
    pub name: String,
    /// Concert description
    pub description: String,
    /// Initial number of seats
    pub seat: i64,
}

impl NewConcert {
    /// Build a creation request.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, seat: i64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            seat,
        }
    }

    /// Check required text fields and the seat bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] naming the first offending field.
    pub fn validate(&self) -> BookingResult<()> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)?;
        check_seats(self.seat)
    }
}

/// Request to reserve a seat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewReservation {
    /// Concert to reserve a seat for
    pub concert_id: String,
    /// User making the reservation
    pub user_id: String,
}

impl NewReservation {
    /// Build a reservation request.
    #[must_use]
    pub fn new(concert_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            concert_id: concert_id.into(),
            user_id: user_id.into(),
        }
    }

    /// Check both identifiers are present.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if either field is blank.
    pub fn validate(&self) -> BookingResult<()> {
        require_text("concertId", &self.concert_id)?;
        require_text("userId", &self.user_id)?;
        Ok(())
    }
}

/// Extract the user id required to cancel a reservation.
///
/// # Errors
///
/// Returns [`BookingError::Validation`] if the id is missing or blank.
pub fn require_user_id(user_id: Option<&str>) -> BookingResult<UserId> {
    match user_id {
        Some(id) if !id.trim().is_empty() => Ok(UserId::new(id)),
        _ => Err(BookingError::validation(
            "userId",
            "is required for cancellation",
        )),
    }
}

/// Check an initial seat count lies in `1..=MAX_SEATS`.
///
/// # Errors
///
/// Returns [`BookingError::Validation`] for the `seat` field otherwise.
pub fn check_seats(seat: i64) -> BookingResult<()> {
    if seat < 1 {
        return Err(BookingError::validation(
            "seat",
            format!("must be at least 1, got {seat}"),
        ));
    }
    if seat > MAX_SEATS {
        return Err(BookingError::validation(
            "seat",
            format!("must be at most {MAX_SEATS}, got {seat}"),
        ));
    }
    Ok(())
}

fn require_text(field: &'static str, value: &str) -> BookingResult<()> {
    if value.trim().is_empty() {
        return Err(BookingError::validation(field, "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_concert() {
        assert_eq!(NewConcert::new("Jazz", "Evening set", 1).validate(), Ok(()));
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = NewConcert::new("   ", "Evening set", 10).validate();
        assert!(matches!(err, Err(BookingError::Validation { field: "name", .. })));
    }

    #[test]
    fn test_empty_description_rejected() {
        let err = NewConcert::new("Jazz", "", 10).validate();
        assert!(matches!(err, Err(BookingError::Validation { field: "description", .. })));
    }

    #[test]
    fn test_non_positive_seats_rejected() {
        for seat in [0, -3] {
            let err = NewConcert::new("Jazz", "Evening set", seat).validate();
            assert!(matches!(err, Err(BookingError::Validation { field: "seat", .. })));
        }
    }

    #[test]
    fn test_seat_upper_bound() {
        assert_eq!(NewConcert::new("Jazz", "Evening set", MAX_SEATS).validate(), Ok(()));
        for seat in [MAX_SEATS + 1, i64::MAX] {
            let err = NewConcert::new("Jazz", "Evening set", seat).validate();
            assert!(matches!(err, Err(BookingError::Validation { field: "seat", .. })));
        }
    }

    #[test]
    fn test_reservation_requires_both_ids() {
        assert!(NewReservation::new("", "u1").validate().is_err());
        assert!(NewReservation::new("c1", "").validate().is_err());
        assert!(NewReservation::new("c1", "u1").validate().is_ok());
    }

    #[test]
    fn test_require_user_id() {
        assert_eq!(require_user_id(Some("u1")), Ok(UserId::new("u1")));
        assert!(require_user_id(Some(" ")).is_err());
        assert!(require_user_id(None).is_err());
    }
}
