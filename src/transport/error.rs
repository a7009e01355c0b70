//! Error types for HTTP operations.

use thiserror::Error;

use crate::context::Cancellation;

/// Error type for HTTP operations.
///
/// Describes what went wrong without dictating recovery strategy.
/// Non-2xx statuses are not errors; they arrive as ordinary responses.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the client's own timeout.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    ///
    /// This typically indicates a configuration error rather than
    /// a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request's context finished before a response arrived.
    #[error("Request aborted: {0}")]
    Cancelled(Cancellation),
}

impl HttpError {
    /// Wraps any error as a connection failure.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connection(Box::new(err))
    }

    /// Returns true if the error is potentially transient and worth another attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            // Network errors are typically transient
            Self::Connection(_) | Self::Timeout => true,
            // URL errors are configuration issues, cancellation is final
            Self::InvalidUrl(_) | Self::Cancelled(_) => false,
        }
    }
}

impl From<Cancellation> for HttpError {
    fn from(reason: Cancellation) -> Self {
        Self::Cancelled(reason)
    }
}
