//! Time abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait that lets the retry loop wait
//! between attempts with real timers in production and without any delay
//! in tests.

use std::time::Duration;

/// Abstraction over async sleeping.
///
/// # Example
///
/// ```
/// use callback::time::{InstantSleeper, Sleeper};
/// use std::time::Duration;
///
/// # async fn demo() {
/// // Returns immediately regardless of the requested duration.
/// InstantSleeper.sleep(Duration::from_secs(60)).await;
/// # }
/// ```
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately.
///
/// Useful in tests that exercise backoff without waiting for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
