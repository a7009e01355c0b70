//! Application execution logic.
//!
//! This module builds the callback from the validated configuration,
//! dispatches it once under a timeout, and reports the response.

use std::io::{self, Write};

use http::StatusCode;
use thiserror::Error;
use tokio::signal;

use callback::config::ValidatedConfig;
use callback::context::Context;
use callback::transport::{
    DefaultHeaders, HttpResponse, ReqwestClient, RetryingTransport, Traced,
};
use callback::{Callback, CallbackError};

/// Transport stack used by the command-line tool.
///
/// Headers are added once per dispatch, then every attempt gets its own span.
pub type AppTransport = DefaultHeaders<RetryingTransport<Traced<ReqwestClient>>>;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Dispatch failed before a response was received.
    #[error("Callback failed: {0}")]
    Dispatch(#[source] CallbackError),

    /// Writing the response to stdout failed.
    #[error("Failed to write response: {0}")]
    Output(#[source] io::Error),
}

/// Builds the transport stack for the configured headers and retry policy.
pub fn build_transport(config: &ValidatedConfig) -> AppTransport {
    let retrying = RetryingTransport::new(Traced::new(ReqwestClient::new()))
        .with_policy(config.retry_policy.clone());

    DefaultHeaders::new(retrying, config.headers.clone())
}

/// Builds the callback entity for the configuration.
pub fn build_callback(config: &ValidatedConfig) -> Callback {
    let mut callback = Callback::new(config.url.as_str()).with_transport(build_transport(config));
    callback.set_payload(config.payload.clone());
    callback
}

/// Dispatches the configured callback once and prints the response.
///
/// The dispatch runs under a context bounded by the configured timeout.
/// Ctrl+C (or SIGTERM on Unix) cancels it.
///
/// Returns the response status; non-2xx statuses are not errors here.
///
/// # Errors
///
/// Returns an error if the callback could not be delivered or the
/// response could not be printed.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<StatusCode, RunError> {
    let mut callback = build_callback(&config);
    let ctx = Context::with_timeout(config.timeout);

    let watcher = {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, cancelling callback...");
            ctx.cancel();
        })
    };

    tracing::info!(url = %config.url, "Sending callback");
    let result = callback.dispatch(&ctx).await;
    watcher.abort();

    let response = result.map_err(RunError::Dispatch)?;
    if response.is_success() {
        tracing::info!(status = %response.status, "Callback delivered");
    } else {
        tracing::warn!(status = %response.status, "Callback rejected");
    }

    report(&response, &mut io::stdout().lock()).map_err(RunError::Output)?;
    Ok(response.status)
}

/// Writes the response status line and body.
pub fn report<W: Write>(response: &HttpResponse, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", response.status)?;
    if !response.body.is_empty() {
        out.write_all(&response.body)?;
        if !response.body.ends_with(b"\n") {
            writeln!(out)?;
        }
    }
    out.flush()
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM on Unix).
///
/// A handler that fails to install never fires.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
