//! # Concert Booking Runtime
//!
//! Runtime for the concert booking service.
//!
//! This crate provides the [`Store`] that owns application state and
//! serializes every mutation through a single write lock.
//!
//! ## Core Components
//!
//! - **Store**: Shared state behind a `RwLock`, plus the injected environment
//! - **Transactions**: Closures run under the write lock, so a multi-step
//!   operation is never interleaved with another
//! - **Health**: Component health checks used by the readiness probe
//!
//! ## Example
//!
//! ```
//! use concert_booking_runtime::Store;
//!
//! # tokio_test::block_on(async {
//! let store = Store::new(0_u32, ());
//!
//! store.transact(|count, _env| *count += 1).await.unwrap();
//!
//! assert_eq!(store.state(|count| *count).await, 1);
//! # });
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Prometheus metrics for observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new transactions
        ///
        /// Returned by `transact()` once `shutdown()` has been called.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for the in-flight transaction to finish
        #[error("Shutdown timed out waiting for in-flight transactions")]
        ShutdownTimeout,
    }
}

/// Health check status levels
///
/// Indicates the current health state of a component or system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Accepting transactions
    Healthy,

    /// Shutting down; reads only
    Unhealthy,
}

impl HealthStatus {
    /// Check if status is healthy
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Check if status is unhealthy
    #[must_use]
    pub const fn is_unhealthy(self) -> bool {
        matches!(self, Self::Unhealthy)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Health check result for a component
#[derive(Debug, Clone)]
pub struct HealthCheck {
    /// Name of the component being checked
    pub component: String,

    /// Current health status
    pub status: HealthStatus,

    /// Optional message providing details
    pub message: Option<String>,

    /// Optional metadata (e.g., transaction counts)
    pub metadata: Vec<(String, String)>,
}

impl HealthCheck {
    /// Create a healthy check result
    #[must_use]
    pub fn healthy(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Healthy,
            message: None,
            metadata: Vec::new(),
        }
    }

    /// Create an unhealthy check result
    #[must_use]
    pub fn unhealthy(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
            metadata: Vec::new(),
        }
    }

    /// Add metadata to the health check
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}

pub use error::StoreError;

/// Store module - the state owner and transaction coordinator
pub mod store {
    use super::{Arc, AtomicBool, Duration, HealthCheck, Ordering, RwLock, StoreError};
    use std::sync::atomic::AtomicU64;

    /// The Store - owner of application state
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Environment (injected dependencies such as clocks and id generators)
    /// 3. A shutdown flag that stops new transactions
    ///
    /// Cloning a Store is cheap and every clone shares the same state.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `E`: Environment type
    pub struct Store<S, E> {
        state: Arc<RwLock<S>>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        transactions: Arc<AtomicU64>,
    }

    impl<S, E> Clone for Store<S, E> {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                transactions: Arc::clone(&self.transactions),
            }
        }
    }

    impl<S, E> std::fmt::Debug for Store<S, E> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("shutdown", &self.shutdown.load(Ordering::Acquire))
                .field("transactions", &self.transactions.load(Ordering::Relaxed))
                .finish_non_exhaustive()
        }
    }

    impl<S, E> Store<S, E>
    where
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state and environment
        #[must_use]
        pub fn new(initial_state: S, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                transactions: Arc::new(AtomicU64::new(0)),
            }
        }

        /// The injected environment
        #[must_use]
        pub fn environment(&self) -> &E {
            &self.environment
        }

        /// Run a closure against the state under the write lock
        ///
        /// This is the only way to mutate state:
        /// 1. Rejects the call if the store is shutting down
        /// 2. Acquires the write lock on state
        /// 3. Runs `f` with the state and the environment
        ///
        /// All steps inside `f` are observed by other callers as one atomic
        /// operation. Concurrent `transact` calls are serialized.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Example
        ///
        /// ```
        /// use concert_booking_runtime::Store;
        ///
        /// # tokio_test::block_on(async {
        /// let store = Store::new(vec![1, 2], ());
        /// let popped = store.transact(|items, _| items.pop()).await.unwrap();
        /// assert_eq!(popped, Some(2));
        /// # });
        /// ```
        #[tracing::instrument(skip_all, name = "store_transact")]
        pub async fn transact<F, T>(&self, f: F) -> Result<T, StoreError>
        where
            F: FnOnce(&mut S, &E) -> T,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected transaction: store is shutting down");
                metrics::counter!("store.shutdown.rejected_transactions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.transactions.total").increment(1);

            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let start = std::time::Instant::now();
            let output = f(&mut *state, &self.environment);
            let duration = start.elapsed();
            drop(state);

            metrics::histogram!("store.transaction.duration_seconds")
                .record(duration.as_secs_f64());
            self.transactions.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(elapsed_us = duration.as_micros(), "Transaction completed");

            Ok(output)
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```
        /// use concert_booking_runtime::Store;
        ///
        /// # tokio_test::block_on(async {
        /// let store = Store::new(vec!["a", "b"], ());
        /// let len = store.state(Vec::len).await;
        /// assert_eq!(len, 2);
        /// # });
        /// ```
        ///
        /// Reads keep working after shutdown.
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Whether `shutdown()` has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Check the health of the store
        ///
        /// The store is healthy until shutdown begins.
        #[must_use]
        pub fn health(&self) -> HealthCheck {
            let completed = self.transactions.load(Ordering::Relaxed);
            let check = if self.is_shutting_down() {
                HealthCheck::unhealthy("store", "Store is shutting down")
            } else {
                HealthCheck::healthy("store")
            };

            check.with_metadata("transactions", completed.to_string())
        }

        /// Initiate graceful shutdown of the store
        ///
        /// This method:
        /// 1. Sets the shutdown flag (rejecting new transactions)
        /// 2. Waits for the in-flight transaction, if any, to release the lock
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the write lock is not
        /// released within `timeout`.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            if let Ok(_guard) = tokio::time::timeout(timeout, self.state.write()).await {
                tracing::info!("No transactions in flight, shutdown successful");
                metrics::counter!("store.shutdown.completed").increment(1);
                Ok(())
            } else {
                tracing::error!(
                    timeout_ms = timeout.as_millis(),
                    "Shutdown timeout: transaction still holds the state lock"
                );
                metrics::counter!("store.shutdown.timeout").increment(1);
                Err(StoreError::ShutdownTimeout)
            }
        }
    }
}

pub use store::Store;

// Test module
#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counter {
        value: i32,
    }

    #[derive(Debug)]
    struct TestEnv {
        step: i32,
    }

    #[tokio::test]
    async fn test_store_creation() {
        let store = Store::new(Counter::default(), TestEnv { step: 1 });
        assert_eq!(store.state(|s| s.value).await, 0);
        assert_eq!(store.environment().step, 1);
    }

    #[tokio::test]
    async fn test_transact_uses_environment() {
        let store = Store::new(Counter::default(), TestEnv { step: 5 });

        let after = store
            .transact(|s, env| {
                s.value += env.step;
                s.value
            })
            .await
            .unwrap();

        assert_eq!(after, 5);
        assert_eq!(store.state(|s| s.value).await, 5);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = Store::new(Counter::default(), TestEnv { step: 1 });
        let other = store.clone();

        other.transact(|s, env| s.value += env.step).await.unwrap();

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_transactions_are_serialized() {
        let store = Store::new(Counter::default(), TestEnv { step: 1 });

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .transact(|s, env| {
                            // Read-modify-write split across two steps.
                            let current = s.value;
                            std::thread::yield_now();
                            s.value = current + env.step;
                        })
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.state(|s| s.value).await, 50);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_transactions() {
        let store = Store::new(Counter::default(), TestEnv { step: 1 });

        store.shutdown(Duration::from_secs(1)).await.unwrap();

        let result = store.transact(|s, env| s.value += env.step).await;
        assert_eq!(result, Err(StoreError::ShutdownInProgress));
        // Reads still work
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_shutdown_times_out_while_transaction_runs() {
        let store = Store::new(Counter::default(), TestEnv { step: 1 });
        let slow = store.clone();
        let in_flight = tokio::spawn(async move {
            slow.transact(|s, env| {
                std::thread::sleep(Duration::from_millis(300));
                s.value += env.step;
            })
            .await
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let result = store.shutdown(Duration::from_millis(20)).await;

        assert_eq!(result, Err(StoreError::ShutdownTimeout));
        assert!(store.is_shutting_down());
        // The transaction admitted before shutdown still completes.
        in_flight.await.unwrap().unwrap();
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_health_reflects_shutdown() {
        let store = Store::new(Counter::default(), TestEnv { step: 1 });
        store.transact(|s, _| s.value += 1).await.unwrap();

        let check = store.health();
        assert!(check.status.is_healthy());
        assert!(check
            .metadata
            .contains(&("transactions".to_string(), "1".to_string())));

        store.shutdown(Duration::from_secs(1)).await.unwrap();
        let check = store.health();
        assert!(check.status.is_unhealthy());
        assert_eq!(check.message.as_deref(), Some("Store is shutting down"));
    }
}
