//! Observability layer for transports.

use std::time::Instant;

use tracing::Instrument;

use super::{HttpRequest, Transport, TransportFuture};

/// Wraps a transport so every call is traced.
///
/// Each call runs inside an `http.request` span carrying the method and URL.
/// The outcome (status or error) and the elapsed time are recorded as debug
/// events. The request and the result pass through untouched.
#[derive(Debug, Clone, Default)]
pub struct Traced<T> {
    inner: T,
}

impl<T> Traced<T> {
    /// Wraps `inner`.
    #[must_use]
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Returns the wrapped transport.
    #[must_use]
    pub const fn inner(&self) -> &T {
        &self.inner
    }

    /// Unwraps the layer.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Transport> Transport for Traced<T> {
    fn perform(&self, req: HttpRequest) -> TransportFuture<'_> {
        let span = tracing::debug_span!(
            "http.request",
            method = %req.method,
            url = %req.url,
        );

        Box::pin(
            async move {
                let started = Instant::now();
                let result = self.inner.perform(req).await;
                let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        tracing::debug!(status = response.status.as_u16(), elapsed_ms, "response");
                    }
                    Err(e) => tracing::debug!(error = %e, elapsed_ms, "request failed"),
                }

                result
            }
            .instrument(span),
        )
    }
}
