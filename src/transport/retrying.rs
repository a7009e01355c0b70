//! Retrying transport with exponential backoff.

use std::sync::LazyLock;

use super::{
    HttpError, HttpRequest, HttpResponse, ReqwestClient, RetryPolicy, Traced, Transport,
    TransportFuture,
};
use crate::time::{Sleeper, TokioSleeper};

/// Transport that re-sends failed requests with exponential backoff.
///
/// Attempts are strictly sequential: each one waits for the previous attempt
/// to fail and for the backoff delay to elapse. Only retryable transport
/// errors (see [`HttpError::is_retryable`]) trigger another attempt. Every
/// response, whatever its status, is returned to the caller unchanged.
///
/// The request's context is honored between and during attempts: once it
/// finishes, the pending attempt or backoff is abandoned and
/// [`HttpError::Cancelled`] is returned.
///
/// # Type Parameters
///
/// - `T`: The base transport each attempt goes through
/// - `S`: The sleeper used for backoff delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```
/// use callback::transport::{ReqwestClient, RetryingTransport};
///
/// // Up to 3 attempts against the network.
/// let transport = RetryingTransport::with_max_retries(ReqwestClient::new(), 3);
/// assert_eq!(transport.policy().max_attempts, 3);
/// ```
#[derive(Debug, Clone)]
pub struct RetryingTransport<T, S = TokioSleeper> {
    base: T,
    sleeper: S,
    policy: RetryPolicy,
}

impl<T> RetryingTransport<T, TokioSleeper> {
    /// Creates a retrying transport with the default [`RetryPolicy`].
    #[must_use]
    pub fn new(base: T) -> Self {
        Self {
            base,
            sleeper: TokioSleeper,
            policy: RetryPolicy::default(),
        }
    }

    /// Creates a retrying transport allowing up to `retries` attempts.
    ///
    /// Values below 1 fall back to [`RetryPolicy::DEFAULT_MAX_ATTEMPTS`].
    #[must_use]
    pub fn with_max_retries(base: T, retries: u32) -> Self {
        Self::new(base).with_policy(RetryPolicy::new().with_max_attempts(retries))
    }
}

impl<T, S> RetryingTransport<T, S> {
    /// Sets a custom sleeper for backoff delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RetryingTransport<T, S2> {
        RetryingTransport {
            base: self.base,
            sleeper,
            policy: self.policy,
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the base transport.
    #[must_use]
    pub const fn base(&self) -> &T {
        &self.base
    }
}

impl<T: Transport, S: Sleeper> RetryingTransport<T, S> {
    async fn perform_with_retry(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let context = req.context.clone();
        let mut attempt = 1;

        loop {
            if let Some(reason) = context.is_done() {
                return Err(HttpError::Cancelled(reason));
            }

            let error = match context.run(self.base.perform(req.clone())).await? {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            if !error.is_retryable() || !self.policy.should_retry(attempt) {
                return Err(error);
            }

            let delay = self.policy.delay_for_retry(attempt - 1);
            tracing::warn!(
                "Attempt {attempt}/{} to {} failed: {error}; retrying in {:.1}s",
                self.policy.max_attempts,
                req.url,
                delay.as_secs_f64()
            );
            context.run(self.sleeper.sleep(delay)).await?;
            attempt += 1;
        }
    }
}

impl<T: Transport, S: Sleeper> Transport for RetryingTransport<T, S> {
    fn perform(&self, req: HttpRequest) -> TransportFuture<'_> {
        Box::pin(self.perform_with_retry(req))
    }
}

/// The transport every callback without an override goes through.
pub type DefaultTransport = RetryingTransport<Traced<ReqwestClient>>;

static DEFAULT_TRANSPORT: LazyLock<DefaultTransport> =
    LazyLock::new(|| RetryingTransport::new(Traced::new(ReqwestClient::new())));

/// Returns the process-wide default transport.
///
/// Built on first use and shared by every dispatch that does not supply an
/// override. It holds no per-call state, so concurrent use is safe.
#[must_use]
pub fn default_transport() -> &'static DefaultTransport {
    &DEFAULT_TRANSPORT
}
