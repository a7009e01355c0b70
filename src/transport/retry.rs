//! Backoff schedule for [`RetryingTransport`](super::RetryingTransport).

use std::time::Duration;

/// How many times a callback is attempted and how long to wait in between.
///
/// The wait before retry `k` (0-based) is `initial_delay * multiplier^k`,
/// never more than `max_delay`. With the defaults a failing delivery is
/// tried at 0 s, 1 s, 3 s, 7 s and 15 s.
///
/// ```
/// use callback::transport::RetryPolicy;
/// use std::time::Duration;
///
/// let patient = RetryPolicy::new()
///     .with_max_attempts(8)
///     .with_max_delay(Duration::from_secs(30));
///
/// assert_eq!(patient.delay_for_retry(0), Duration::from_secs(1));
/// assert_eq!(patient.delay_for_retry(6), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Always at least 1.
    pub max_attempts: u32,

    /// Wait before the first retry.
    pub initial_delay: Duration,

    /// Upper bound on any single wait.
    pub max_delay: Duration,

    /// Growth factor between consecutive waits.
    pub multiplier: f64,
}

impl RetryPolicy {
    /// Attempts used when none (or zero) is configured.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

    /// Wait before the first retry unless configured otherwise.
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

    /// Cap on a single wait unless configured otherwise.
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

    /// Doubling backoff.
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Five attempts, 1 s doubling up to 60 s.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
        }
    }

    /// Sets the attempt budget. Zero means [`Self::DEFAULT_MAX_ATTEMPTS`].
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = if max_attempts == 0 {
            Self::DEFAULT_MAX_ATTEMPTS
        } else {
            max_attempts
        };
        self
    }

    /// Sets the first wait. Zero retries back to back.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Caps every wait at `delay`.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the growth factor.
    ///
    /// # Panics
    ///
    /// If `multiplier` is zero, negative or NaN.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(multiplier > 0.0, "multiplier must be positive");
        self.multiplier = multiplier;
        self
    }

    /// Wait before retry number `retry`, counting from 0.
    ///
    /// Saturates at `max_delay`, including when the exponential term no
    /// longer fits in a [`Duration`].
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }

        #[allow(clippy::cast_possible_wrap)]
        let exponent = retry.min(i32::MAX as u32) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);

        Duration::try_from_secs_f64(secs).map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Whether attempt number `attempt` (1-based) may be followed by another.
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
