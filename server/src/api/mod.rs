//! HTTP API endpoints.
//!
//! JSON bodies use camelCase field names. Read endpoints wrap their payload
//! in a `{ "data": ..., "success": true }` envelope.

pub mod concerts;
pub mod reservations;

use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Response payload
    pub data: T,
    /// Always `true`; failures are reported through `AppError`
    pub success: bool,
}

impl<T> Envelope<T> {
    /// Wrap a successful payload.
    pub const fn ok(data: T) -> Self {
        Self {
            data,
            success: true,
        }
    }
}

/// A list and its length.
#[derive(Debug, Serialize)]
pub struct ListPayload<T> {
    /// Items
    pub list: Vec<T>,
    /// Number of items
    pub total: usize,
}

impl<T> From<Vec<T>> for ListPayload<T> {
    fn from(list: Vec<T>) -> Self {
        Self {
            total: list.len(),
            list,
        }
    }
}

/// A bare count, reported without a `data` wrapper.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    /// Count
    pub total: usize,
    /// Always `true`
    pub success: bool,
}

/// A confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}
