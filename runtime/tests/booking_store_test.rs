//! Store transactions over the booking state under concurrent load.

#![allow(clippy::unwrap_used)] // Integration tests can unwrap for setup

use concert_booking_core::{
    BookingEnvironment, BookingError, BookingState, ConcertId, ConflictReason, UserId,
};
use concert_booking_runtime::Store;
use concert_booking_testing::{assertions, init_test_tracing, test_environment};
use futures::future::join_all;

async fn store_with_concert(seats: i64) -> (Store<BookingState, BookingEnvironment>, ConcertId) {
    let store = Store::new(BookingState::default(), test_environment());
    let concert = store
        .transact(|state, env| state.registry.create("Aurora", "Open air", seats, env))
        .await
        .unwrap()
        .unwrap();
    (store, concert.id)
}

fn reserve(
    store: &Store<BookingState, BookingEnvironment>,
    concert_id: ConcertId,
    user: String,
) -> impl std::future::Future<Output = Result<(), BookingError>> + Send + 'static {
    let store = store.clone();
    async move {
        store
            .transact(move |state, env| {
                let BookingState { registry, ledger } = state;
                ledger
                    .create(registry, &concert_id, &UserId::new(user), env)
                    .map(|_| ())
            })
            .await
            .unwrap()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reservations_never_oversell() {
    init_test_tracing();
    let (store, concert) = store_with_concert(10).await;

    let handles: Vec<_> = (0..40)
        .map(|i| tokio::spawn(reserve(&store, concert, format!("user-{i}"))))
        .collect();
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 10);
    assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| matches!(
        e,
        BookingError::Conflict(ConflictReason::NoAvailableSeats { .. })
    )));

    store
        .state(|state| {
            assert_eq!(state.registry.find_one(&concert).unwrap().seat, 0);
            assert_eq!(state.ledger.get_all_reservations().len(), 10);
            assert_eq!(state.ledger.get_reservation_logs().len(), 10);
            assertions::assert_seat_conservation(state, &concert);
            assertions::assert_no_duplicate_active(state);
        })
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicates_admit_one_reservation() {
    let (store, concert) = store_with_concert(20).await;

    let handles: Vec<_> = (0..8)
        .map(|_| tokio::spawn(reserve(&store, concert, "same-user".to_string())))
        .collect();
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    store
        .state(|state| {
            assert_eq!(state.ledger.active_count_for_concert(&concert), 1);
            assertions::assert_no_duplicate_active(state);
            // Each rejected duplicate still consumed a seat.
            assert_eq!(state.registry.find_one(&concert).unwrap().seat, 20 - 8);
        })
        .await;
}
