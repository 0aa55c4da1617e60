//! # Concert Booking Testing
//!
//! Testing utilities and helpers for the concert booking service.
//!
//! This crate provides:
//! - Deterministic implementations of the environment traits
//! - A Given-When-Then harness for registry and ledger operations
//! - Invariant assertions (seat conservation, no duplicates, log ordering)
//! - proptest strategies for random booking workloads
//!
//! ## Example
//!
//! ```
//! use concert_booking_core::{BookingState, UserId};
//! use concert_booking_testing::{assertions, test_environment};
//!
//! let env = test_environment();
//! let mut state = BookingState::default();
//! let concert = state.registry.create("Gala", "Season opener", 2, &env).unwrap();
//!
//! let BookingState { registry, ledger } = &mut state;
//! ledger.create(registry, &concert.id, &UserId::new("u1"), &env).unwrap();
//!
//! assertions::assert_seat_conservation(&state, &concert.id);
//! ```

use chrono::{DateTime, Duration, Utc};
use concert_booking_core::environment::{BookingEnvironment, Clock, IdGenerator};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use uuid::Uuid;


/// Mock implementations of environment traits
pub mod mocks {
    use super::{
        Arc, AtomicI64, AtomicU64, BookingEnvironment, Clock, DateTime, Duration, IdGenerator,
        Ordering, Utc, Uuid,
    };

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use concert_booking_testing::mocks::FixedClock;
    /// use concert_booking_core::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every read.
    ///
    /// Gives every audit entry a distinct, increasing timestamp.
    #[derive(Debug)]
    pub struct SteppingClock {
        start: DateTime<Utc>,
        step_millis: i64,
        ticks: AtomicI64,
    }

    impl SteppingClock {
        /// Start at `start`, advancing `step` per call to `now`.
        #[must_use]
        pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                start,
                step_millis: step.num_milliseconds(),
                ticks: AtomicI64::new(0),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            self.start + Duration::milliseconds(tick * self.step_millis)
        }
    }

    /// Predictable ids: `00000000-0000-0000-0000-000000000001`, `...02`, and so on.
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Start counting at 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_uuid(&self) -> Uuid {
            let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            Uuid::from_u128(u128::from(n))
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }

    /// Fixed clock and sequential ids.
    #[must_use]
    pub fn test_environment() -> BookingEnvironment {
        BookingEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new()))
    }

    /// One-second stepping clock and sequential ids.
    #[must_use]
    pub fn stepping_environment() -> BookingEnvironment {
        BookingEnvironment::new(
            Arc::new(SteppingClock::new(epoch(), Duration::seconds(1))),
            Arc::new(SequentialIdGenerator::new()),
        )
    }

    #[allow(clippy::expect_used)]
    fn epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }
}

/// Invariant assertions over booking state
pub mod assertions {
    use concert_booking_core::{BookingState, ConcertId, ReservationLogEntry};
    use std::collections::HashSet;

    /// Assert `seat + active reservations == capacity` for one concert.
    ///
    /// # Panics
    ///
    /// Panics if the concert is missing or the counts do not add up.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_seat_conservation(state: &BookingState, concert_id: &ConcertId) {
        let Ok(concert) = state.registry.find_one(concert_id) else {
            panic!("concert {concert_id} not found");
        };
        let active = i64::try_from(state.ledger.active_count_for_concert(concert_id))
            .unwrap_or(i64::MAX);
        assert_eq!(
            concert.seat + active,
            concert.capacity,
            "seat {} + active {} != capacity {} for concert {}",
            concert.seat,
            active,
            concert.capacity,
            concert_id
        );
    }

    /// Assert no user holds two active reservations for the same concert.
    ///
    /// # Panics
    ///
    /// Panics on the first duplicate pair found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_duplicate_active(state: &BookingState) {
        let mut seen = HashSet::new();
        for reservation in state.ledger.get_all_reservations() {
            assert!(
                seen.insert((reservation.concert_id, reservation.user_id.clone())),
                "duplicate active reservation for user {} on concert {}",
                reservation.user_id,
                reservation.concert_id
            );
        }
    }

    /// Assert log entries are non-increasing by timestamp.
    ///
    /// # Panics
    ///
    /// Panics if an entry is newer than its predecessor.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_logs_newest_first(logs: &[ReservationLogEntry]) {
        for pair in logs.windows(2) {
            assert!(
                pair[0].timestamp >= pair[1].timestamp,
                "log entry {} ({}) is older than the following entry {} ({})",
                pair[0].id,
                pair[0].timestamp,
                pair[1].id,
                pair[1].timestamp
            );
        }
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// One step of a random booking workload over a small id space.
    #[derive(Debug, Clone)]
    pub enum BookingOp {
        /// User index reserves a seat of concert index
        Reserve {
            /// Index into the workload's concerts
            concert: usize,
            /// Index into the workload's users
            user: usize,
        },
        /// User index cancels their n-th active reservation, if any
        Cancel {
            /// Index into the workload's users
            user: usize,
            /// Which of the user's active reservations to cancel
            nth: usize,
        },
    }

    /// Strategy for a single operation.
    pub fn booking_op(concerts: usize, users: usize) -> impl Strategy<Value = BookingOp> {
        prop_oneof![
            3 => (0..concerts, 0..users).prop_map(|(concert, user)| BookingOp::Reserve { concert, user }),
            1 => (0..users, 0..4usize).prop_map(|(user, nth)| BookingOp::Cancel { user, nth }),
        ]
    }

    /// Strategy for a workload of up to `max_len` operations.
    pub fn booking_ops(
        concerts: usize,
        users: usize,
        max_len: usize,
    ) -> impl Strategy<Value = Vec<BookingOp>> {
        prop::collection::vec(booking_op(concerts, users), 0..max_len)
    }

    /// Strategy for concert capacities.
    pub fn capacity() -> impl Strategy<Value = i64> {
        1i64..6
    }
}

/// Install a test tracing subscriber once; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{
    FixedClock, SequentialIdGenerator, SteppingClock, stepping_environment, test_clock,
    test_environment,
};
