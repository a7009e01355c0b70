//! The callback entity and its dispatch pipeline.
//!
//! A [`Callback`] names a destination, an optional [`Payload`], and an
//! optional transport override. [`Callback::dispatch`] validates it, encodes
//! the payload, builds a POST request, and runs it through the selected
//! transport under the caller's [`Context`].
//!
//! # Transport selection
//!
//! Without an override, requests go through the process-wide
//! [`default_transport`], which retries transport failures with exponential
//! backoff. With an override, the override is wrapped in [`Traced`] and
//! called exactly once per dispatch: the built-in retry loop is bypassed and
//! delivery semantics are entirely the override's. Wrap the override in a
//! [`RetryingTransport`](crate::transport::RetryingTransport) to get retries back.
//!
//! # Ownership
//!
//! [`Callback::validate`] and [`Callback::dispatch`] take `&mut self`, so a
//! callback can only be dispatched by one caller at a time. Different
//! callbacks can be dispatched concurrently.

use std::fmt;
use std::sync::Arc;

use http::HeaderValue;
use http::header::CONTENT_TYPE;
use thiserror::Error;

use crate::context::{Cancellation, Context};
use crate::payload::{self, Payload};
use crate::transport::{HttpError, HttpRequest, HttpResponse, Traced, Transport, default_transport};

/// Error type for callback dispatch.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// The destination URL is empty or whitespace only.
    #[error("empty callback URL")]
    EmptyUrl,

    /// The destination URL could not be parsed.
    #[error("Invalid callback URL '{url}': {reason}")]
    InvalidUrl {
        /// The trimmed URL string
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A structured payload could not be serialized.
    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// The context was cancelled or its deadline passed.
    #[error("Callback aborted: {0}")]
    Cancelled(Cancellation),

    /// The transport failed to deliver the request.
    #[error("Callback delivery failed: {0}")]
    Transport(#[source] HttpError),
}

impl CallbackError {
    /// Returns true if the dispatch was aborted by its context.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

impl From<HttpError> for CallbackError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Cancelled(reason) => Self::Cancelled(reason),
            other => Self::Transport(other),
        }
    }
}

impl From<Cancellation> for CallbackError {
    fn from(reason: Cancellation) -> Self {
        Self::Cancelled(reason)
    }
}

/// One POST delivery: where to send it, what to send, and how.
///
/// # Example
///
/// ```no_run
/// use callback::{Callback, Payload, context::Context};
///
/// # async fn example() -> Result<(), callback::CallbackError> {
/// let mut cb = Callback::new("https://example.com/payload")
///     .with_payload(Payload::structured(serde_json::json!({"time_now": 1_700_000_000})));
///
/// let response = cb.dispatch(&Context::background()).await?;
/// println!("Response: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct Callback {
    url: String,
    payload: Option<Payload>,
    transport: Option<Arc<dyn Transport>>,
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("url", &self.url)
            .field("payload", &self.payload)
            .field("transport", &self.transport.as_ref().map(|_| "custom"))
            .finish()
    }
}

impl Callback {
    /// Creates a callback to `url` with no payload and the default transport.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            payload: None,
            transport: None,
        }
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Sets a transport override.
    ///
    /// The override is called once per dispatch; the built-in retry loop is
    /// not applied to it.
    #[must_use]
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Sets a shared transport override.
    #[must_use]
    pub fn with_shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replaces the destination URL.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Replaces or clears the payload.
    pub fn set_payload(&mut self, payload: Option<Payload>) {
        self.payload = payload;
    }

    /// Returns the destination URL as currently stored.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the payload, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Returns true if a transport override is configured.
    #[must_use]
    pub const fn has_transport_override(&self) -> bool {
        self.transport.is_some()
    }

    /// Trims the destination URL and stores the trimmed value.
    ///
    /// Validating twice leaves the URL unchanged the second time.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::EmptyUrl`] if nothing is left after trimming.
    /// The stored URL is not modified in that case.
    pub fn validate(&mut self) -> Result<(), CallbackError> {
        let trimmed = self.url.trim();
        if trimmed.is_empty() {
            return Err(CallbackError::EmptyUrl);
        }
        if trimmed.len() != self.url.len() {
            self.url = trimmed.to_string();
        }
        Ok(())
    }

    /// Validates, encodes, and delivers the callback.
    ///
    /// The response is returned as received: non-2xx statuses are not errors.
    ///
    /// # Errors
    ///
    /// - [`CallbackError::EmptyUrl`] / [`CallbackError::InvalidUrl`] before any I/O
    /// - [`CallbackError::Encode`] before any I/O
    /// - [`CallbackError::Cancelled`] if `ctx` is or becomes done
    /// - [`CallbackError::Transport`] with the last transport error otherwise
    pub async fn dispatch(&mut self, ctx: &Context) -> Result<HttpResponse, CallbackError> {
        let request = self.build_request(ctx)?;

        match &self.transport {
            None => Self::execute(default_transport(), request, ctx).await,
            Some(transport) => {
                let traced = Traced::new(Arc::clone(transport));
                Self::execute(&traced, request, ctx).await
            }
        }
    }

    /// Runs validation and encoding and assembles the outbound request.
    fn build_request(&mut self, ctx: &Context) -> Result<HttpRequest, CallbackError> {
        self.validate()?;

        let url = url::Url::parse(&self.url).map_err(|e| CallbackError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        let encoded = payload::encode(self.payload.as_ref())?;
        let is_json = encoded.is_json;

        let mut request = HttpRequest::post(url).with_context(ctx.clone());
        request.body = encoded.into_body();
        if is_json {
            request = request.with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(request)
    }

    async fn execute<T: Transport + ?Sized>(
        transport: &T,
        request: HttpRequest,
        ctx: &Context,
    ) -> Result<HttpResponse, CallbackError> {
        Ok(ctx.run(transport.perform(request)).await??)
    }
}
