//! HTTP request/response types and the transport trait.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::HttpError;
use crate::context::Context;

/// An HTTP request to be sent.
///
/// This is a value type that can be constructed and passed to any
/// [`Transport`] implementation. It uses standard `http` crate types
/// for method and headers. The body is fully buffered, so a transport
/// that retries can send it again as many times as it needs.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: http::Method,
    /// Target URL
    pub url: url::Url,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
    /// Optional request body
    pub body: Option<Vec<u8>>,
    /// Cancellation scope the request runs under
    pub context: Context,
}

impl HttpRequest {
    /// Creates a new HTTP request with the given method and URL.
    ///
    /// Headers are initialized to an empty map, body is `None`, and the
    /// request runs under [`Context::background`].
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
            context: Context::background(),
        }
    }

    /// Creates a GET request to the given URL.
    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self::new(http::Method::GET, url)
    }

    /// Creates a POST request to the given URL.
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self::new(http::Method::POST, url)
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header to the request.
    ///
    /// If the header name already exists, the value is appended
    /// (HTTP headers can have multiple values).
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Binds the request to a cancellation context.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }
}

/// An HTTP response received from a server.
///
/// Contains the status code, headers, and body of the response.
/// The body is fully buffered into memory.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Response body (fully buffered)
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new HTTP response.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as a UTF-8 string, if valid.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Future returned by [`Transport::perform`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

/// Something that performs HTTP requests.
///
/// # Design
///
/// The default retrying transport, the observability wrapper, and any
/// caller-supplied override are all implementations of this one trait and
/// compose by wrapping. The returned future is boxed so that overrides can
/// be stored as `Arc<dyn Transport>`.
///
/// # Example
///
/// ```
/// use callback::transport::{HttpError, HttpRequest, HttpResponse, Transport, TransportFuture};
///
/// struct Canned {
///     response: HttpResponse,
/// }
///
/// impl Transport for Canned {
///     fn perform(&self, _req: HttpRequest) -> TransportFuture<'_> {
///         Box::pin(async move { Ok(self.response.clone()) })
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Sends an HTTP request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when:
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - URL is invalid ([`HttpError::InvalidUrl`])
    /// - The request's context finished first ([`HttpError::Cancelled`])
    fn perform(&self, req: HttpRequest) -> TransportFuture<'_>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn perform(&self, req: HttpRequest) -> TransportFuture<'_> {
        (**self).perform(req)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn perform(&self, req: HttpRequest) -> TransportFuture<'_> {
        (**self).perform(req)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn perform(&self, req: HttpRequest) -> TransportFuture<'_> {
        (**self).perform(req)
    }
}
