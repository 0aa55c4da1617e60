//! Concert Registry.
//!
//! Owns concert records and their seat counters. The registry is a dumb
//! counter: it knows nothing about reservations and does not guard the
//! zero-seat boundary. That rule lives in the ledger, which checks
//! availability before calling [`ConcertRegistry::decrease_seats`].

use crate::environment::BookingEnvironment;
use crate::error::{BookingError, BookingResult};
use crate::types::{Concert, ConcertId, ConcertListing};
use crate::validation::check_seats;

/// In-memory store of concerts, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ConcertRegistry {
    concerts: Vec<Concert>,
}

impl ConcertRegistry {
    /// Creates an empty registry
    #[must_use]
    pub const fn new() -> Self {
        Self {
            concerts: Vec::new(),
        }
    }

    /// Create a concert with `initial_seats` available seats.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if `initial_seats` is outside
    /// `1..=MAX_SEATS`.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        initial_seats: i64,
        env: &BookingEnvironment,
    ) -> BookingResult<Concert> {
        check_seats(initial_seats)?;

        let concert = Concert {
            id: ConcertId::from_uuid(env.ids.next_uuid()),
            name: name.into(),
            description: description.into(),
            seat: initial_seats,
            capacity: initial_seats,
        };
        self.concerts.push(concert.clone());

        tracing::info!(concert_id = %concert.id, seats = initial_seats, "Concert created");
        Ok(concert)
    }

    /// Every concert in insertion order, with the sum of their seat counters.
    #[must_use]
    pub fn find_all(&self) -> ConcertListing {
        ConcertListing {
            concerts: self.concerts.clone(),
            total_seats: self
                .concerts
                .iter()
                .fold(0, |total: i64, c| total.saturating_add(c.seat)),
        }
    }

    /// Look up a concert by id.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if no concert has this id.
    pub fn find_one(&self, id: &ConcertId) -> BookingResult<&Concert> {
        self.concerts
            .iter()
            .find(|c| c.id == *id)
            .ok_or_else(|| BookingError::concert_not_found(id))
    }

    /// Delete a concert permanently.
    ///
    /// Outstanding reservations are not checked here.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if no concert has this id.
    pub fn remove(&mut self, id: &ConcertId) -> BookingResult<Concert> {
        let index = self.position(id)?;
        let removed = self.concerts.remove(index);
        tracing::info!(concert_id = %id, "Concert removed");
        Ok(removed)
    }

    /// Take one seat, unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if no concert has this id.
    pub fn decrease_seats(&mut self, id: &ConcertId) -> BookingResult<()> {
        let concert = self.find_mut(id)?;
        concert.seat -= 1;
        Ok(())
    }

    /// Give one seat back, unconditionally.
    ///
    /// There is no upper bound: a misused counter can drift above the
    /// concert's capacity. That case is logged, not prevented.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if no concert has this id.
    pub fn increase_seats(&mut self, id: &ConcertId) -> BookingResult<()> {
        let concert = self.find_mut(id)?;
        concert.seat += 1;
        if concert.seat > concert.capacity {
            tracing::warn!(
                concert_id = %id,
                seat = concert.seat,
                capacity = concert.capacity,
                "Seat counter exceeds concert capacity"
            );
        }
        Ok(())
    }

    /// Whether a concert with this id exists.
    #[must_use]
    pub fn contains(&self, id: &ConcertId) -> bool {
        self.concerts.iter().any(|c| c.id == *id)
    }

    /// Number of stored concerts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.concerts.len()
    }

    /// Whether the registry holds no concerts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concerts.is_empty()
    }

    fn position(&self, id: &ConcertId) -> BookingResult<usize> {
        self.concerts
            .iter()
            .position(|c| c.id == *id)
            .ok_or_else(|| BookingError::concert_not_found(id))
    }

    fn find_mut(&mut self, id: &ConcertId) -> BookingResult<&mut Concert> {
        self.concerts
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or_else(|| BookingError::concert_not_found(id))
    }
}
