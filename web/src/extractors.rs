//! Custom Axum extractors.
//!
//! - `CorrelationId`: the request's correlation ID, as assigned by the
//!   correlation middleware
//! - `JsonBody`: `Json` whose rejections become `VALIDATION_ERROR` responses
//!
//! # Examples
//!
//! ```
//! use concert_booking_web::extractors::CorrelationId;
//!
//! async fn handler(correlation_id: CorrelationId) -> String {
//!     format!("Request ID: {correlation_id}")
//! }
//! ```

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use std::fmt;
use uuid::Uuid;

/// Longest client-supplied correlation ID that is echoed back.
const MAX_CORRELATION_ID_LEN: usize = 128;

/// Correlation ID for request tracing.
///
/// Taken from request extensions when the middleware ran, otherwise from the
/// `X-Correlation-ID` header, otherwise a fresh UUID v4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Read the header, or generate a new ID when it is absent or unusable.
    ///
    /// A usable header is non-blank visible ASCII of at most 128 bytes.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| {
                !s.is_empty()
                    && s.len() <= MAX_CORRELATION_ID_LEN
                    && s.bytes().all(|b| b.is_ascii_graphic())
            })
            .map_or_else(Self::generate, |s| Self(s.to_string()))
    }

    /// Fresh random ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The ID as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .cloned()
            .unwrap_or_else(|| Self::from_headers(&parts.headers)))
    }
}

/// JSON request body.
///
/// Same as [`axum::Json`], except that syntax errors, wrong field types and a
/// missing content type are answered with the usual [`AppError`] body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
