//! Dependency injection for the booking domain.
//!
//! Timestamps and identifiers are the only non-deterministic inputs of the
//! registry and the ledger. Both are abstracted behind traits so tests can
//! pin them down.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```
/// use concert_booking_core::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let earlier = clock.now();
/// assert!(clock.now() >= earlier);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Source of fresh unique identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produce an identifier never returned before by this generator.
    fn next_uuid(&self) -> Uuid;
}

/// Wall clock backed by `chrono::Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Environment dependencies for registry and ledger operations
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Clock for timestamps
    pub clock: Arc<dyn Clock>,
    /// Generator for concert, reservation and log entry ids
    pub ids: Arc<dyn IdGenerator>,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// System clock and random ids.
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }
}

impl fmt::Debug for BookingEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingEnvironment")
            .field("clock", &"<dyn Clock>")
            .field("ids", &"<dyn IdGenerator>")
            .finish()
    }
}
