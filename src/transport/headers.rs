//! Header-injecting transport decorator.

use super::{HttpRequest, Transport, TransportFuture};

/// Appends a fixed set of headers to every request before delegating.
///
/// The callback core never sets headers beyond the JSON content type. Callers
/// that need authentication or custom headers supply them through their own
/// transport; this decorator is the ready-made way to do that.
///
/// Headers already present on the request are kept. Values for the same
/// name are appended, not replaced.
///
/// # Example
///
/// ```
/// use callback::transport::{DefaultHeaders, ReqwestClient};
/// use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
///
/// let mut headers = HeaderMap::new();
/// headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer token"));
/// let transport = DefaultHeaders::new(ReqwestClient::new(), headers);
/// assert_eq!(transport.headers().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DefaultHeaders<T> {
    inner: T,
    headers: http::HeaderMap,
}

impl<T> DefaultHeaders<T> {
    /// Wraps `inner`, adding `headers` to each request.
    #[must_use]
    pub const fn new(inner: T, headers: http::HeaderMap) -> Self {
        Self { inner, headers }
    }

    /// Returns the headers added to each request.
    #[must_use]
    pub const fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Returns the wrapped transport.
    #[must_use]
    pub const fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for DefaultHeaders<T> {
    fn perform(&self, mut req: HttpRequest) -> TransportFuture<'_> {
        for (name, value) in &self.headers {
            req.headers.append(name, value.clone());
        }
        self.inner.perform(req)
    }
}
