//! Concurrent requests through the service never oversell a concert.

#![allow(clippy::unwrap_used)] // Integration tests can unwrap for setup

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use concert_booking::{AppState, BookingService, build_router};
use concert_booking_core::{NewConcert, NewReservation};
use concert_booking_testing::{assertions, test_environment};
use futures::future::join_all;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_http_reservations_respect_capacity() {
    let service = BookingService::new(test_environment());
    let concert = service
        .create_concert(NewConcert::new("Aurora", "Open air", 5))
        .await
        .unwrap();
    let router = build_router(AppState::new(service.clone()));

    let requests = (0..25).map(|i| {
        let router = router.clone();
        let body = json!({ "concertId": concert.id.to_string(), "userId": format!("user-{i}") });
        tokio::spawn(async move {
            let request = Request::builder()
                .method(Method::POST)
                .uri("/reservations")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            router.oneshot(request).await.unwrap().status()
        })
    });
    let statuses: Vec<StatusCode> = join_all(requests)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 5);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 20);

    let remaining = service.get_concert(&concert.id.to_string()).await.unwrap();
    assert_eq!(remaining.seat, 0);
    service
        .store()
        .state(|state| {
            assertions::assert_seat_conservation(state, &concert.id);
            assertions::assert_no_duplicate_active(state);
        })
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_reserve_and_cancel_keep_counts_consistent() {
    let service = BookingService::new(test_environment());
    let concert = service
        .create_concert(NewConcert::new("Aurora", "Open air", 10))
        .await
        .unwrap();

    let mut reservations = Vec::new();
    for i in 0..5 {
        reservations.push(
            service
                .create_reservation(NewReservation::new(concert.id.to_string(), format!("old-{i}")))
                .await
                .unwrap(),
        );
    }

    let cancels = reservations.into_iter().map(|r| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .cancel_reservation(&r.id.to_string(), Some(r.user_id.as_str()))
                .await
        })
    });
    let creates = (0..5).map(|i| {
        let service = service.clone();
        let concert_id = concert.id.to_string();
        tokio::spawn(async move {
            service
                .create_reservation(NewReservation::new(concert_id, format!("new-{i}")))
                .await
                .map(|_| ())
        })
    });

    for result in join_all(cancels).await {
        result.unwrap().unwrap();
    }
    for result in join_all(creates).await {
        result.unwrap().unwrap();
    }

    assert_eq!(service.all_reservations().await.len(), 5);
    assert_eq!(service.cancelled_count().await, 5);
    assert_eq!(service.reservation_logs().await.len(), 15);
    service
        .store()
        .state(|state| assertions::assert_seat_conservation(state, &concert.id))
        .await;
}
