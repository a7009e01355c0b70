//! Cancellation context for dispatches.
//!
//! A [`Context`] travels with every request. It can be cancelled explicitly,
//! or it can expire when its deadline passes. Transports check it before and
//! during each attempt, and the retry loop checks it during backoff.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a context is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancellation {
    /// The context was cancelled explicitly.
    Cancelled,
    /// The context's deadline passed.
    DeadlineExceeded,
}

impl fmt::Display for Cancellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "context cancelled"),
            Self::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

/// Cancellation scope for one or more dispatches.
///
/// Cloning a context yields a handle to the same scope: cancelling any clone
/// cancels all of them. Use [`Context::child`] for a scope that can be
/// cancelled independently of its parent.
///
/// # Example
///
/// ```
/// use callback::context::{Cancellation, Context};
///
/// let ctx = Context::background();
/// assert_eq!(ctx.is_done(), None);
///
/// ctx.cancel();
/// assert_eq!(ctx.is_done(), Some(Cancellation::Cancelled));
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// Creates a context that is never done unless cancelled.
    #[must_use]
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Creates a context that expires after `timeout`.
    ///
    /// A timeout too large to represent as an instant means no deadline.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Creates a context that expires at `deadline`.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Creates a context cancelled whenever this one is.
    ///
    /// The child inherits this context's deadline. Cancelling the child does
    /// not affect the parent.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Returns a child context whose deadline is at most `timeout` from now.
    #[must_use]
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let deadline = match (self.deadline, Instant::now().checked_add(timeout)) {
            (Some(parent), Some(requested)) => Some(parent.min(requested)),
            (parent, requested) => parent.or(requested),
        };
        Self {
            token: self.token.child_token(),
            deadline,
        }
    }

    /// Cancels this context and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns why the context is done, or `None` if it is still live.
    #[must_use]
    pub fn is_done(&self) -> Option<Cancellation> {
        if self.token.is_cancelled() {
            return Some(Cancellation::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Cancellation::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> Cancellation {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    () = self.token.cancelled() => Cancellation::Cancelled,
                    () = tokio::time::sleep_until(deadline) => Cancellation::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                Cancellation::Cancelled
            }
        }
    }

    /// Runs `fut` until it completes or the context is done.
    ///
    /// # Errors
    ///
    /// Returns the [`Cancellation`] reason if the context finishes first.
    /// A context that is already done never polls `fut`.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Cancellation> {
        if let Some(reason) = self.is_done() {
            return Err(reason);
        }
        tokio::select! {
            biased;
            reason = self.done() => Err(reason),
            output = fut => Ok(output),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}
