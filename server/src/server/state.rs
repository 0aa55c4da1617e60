//! Application state for the booking HTTP server.

use crate::service::BookingService;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; clones share one store.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Booking facade over the shared store
    pub service: BookingService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(service: BookingService) -> Self {
        Self { service }
    }
}
