//! # Concert Booking Server
//!
//! HTTP service for concert seat inventory and reservations.
//!
//! - [`service::BookingService`]: validated, transactional operations over the
//!   shared booking state
//! - [`api`]: JSON handlers for concerts and reservations
//! - [`server`]: router, application state and health endpoints
//! - [`config`]: environment-driven configuration
//!
//! ## Example
//!
//! ```
//! use concert_booking::{AppState, BookingService, build_router};
//! use concert_booking_core::BookingEnvironment;
//!
//! let service = BookingService::new(BookingEnvironment::production());
//! let app = build_router(AppState::new(service));
//! # drop(app);
//! ```

pub mod api;
pub mod config;
pub mod server;
pub mod service;

pub use config::Config;
pub use server::{AppState, build_router};
pub use service::{BookingService, ServiceError, ServiceResult};
