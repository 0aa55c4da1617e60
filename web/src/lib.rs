//! Axum integration for the concert booking service.
//!
//! This crate is the HTTP edge of the service, implementing the
//! "Functional Core, Imperative Shell" pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, correlation IDs
//! │  - Request parsing                      │  ← Error mapping
//! │  - Response serialization               │  ← Logging
//! ├─────────────────────────────────────────┤
//! │         Functional Core                 │
//! │  - Concert Registry                     │  ← Plain owned data
//! │  - Reservation Ledger                   │  ← Serialized by the Store
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract data** from request (JSON, path, query)
//! 3. **Validate** into a domain request
//! 4. **Run** one transaction through the `Store`
//! 5. **Map result** to an HTTP response ([`AppError`] for failures)

#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{CorrelationId, JsonBody};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
