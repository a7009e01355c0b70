//! Transport layer for delivering callback requests.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting request execution ([`Transport`])
//! - Production network transport ([`ReqwestClient`])
//! - Exponential-backoff retry ([`RetryingTransport`], [`RetryPolicy`])
//! - Tracing every call ([`Traced`])
//! - Adding caller-supplied headers ([`DefaultHeaders`])
//!
//! Dispatches without an override go through [`default_transport`], a
//! process-wide [`RetryingTransport`] over a traced [`ReqwestClient`].

mod client;
mod error;
mod headers;
mod request;
mod retry;
mod retrying;
mod traced;

#[cfg(test)]
mod retry_tests;
#[cfg(test)]
mod retrying_tests;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use client::ReqwestClient;
pub use error::HttpError;
pub use headers::DefaultHeaders;
pub use request::{HttpRequest, HttpResponse, Transport, TransportFuture};
pub use retry::RetryPolicy;
pub use retrying::{DefaultTransport, RetryingTransport, default_transport};
pub use traced::Traced;
