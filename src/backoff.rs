//! Retry discipline for failed `accept` calls.
//!
//! Transient failures (descriptor exhaustion, aborted connections) are retried
//! after an exponentially growing delay; anything else ends the accept loop.

use std::io;
use std::time::Duration;

/// Delay bounds for retrying transient accept errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay after the first transient error.
    ///
    /// Default: 5 ms
    pub min: Duration,

    /// Upper bound on the delay.
    ///
    /// Default: 1 s
    pub max: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(5),
            max: Duration::from_secs(1),
        }
    }
}

impl BackoffPolicy {
    /// Create a policy with custom bounds.
    #[must_use]
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Delay before the `n`-th consecutive retry (1-based).
    ///
    /// Equals `min(min * 2^(n-1), max)`; `0` yields no delay.
    #[must_use]
    pub fn delay_for(&self, n: u32) -> Duration {
        if n == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(n - 1);
        self.min.saturating_mul(factor).min(self.max)
    }
}

/// Backoff state owned by a single accept loop.
///
/// Starts at zero, doubles on each consecutive transient error (clamped to
/// the policy maximum) and drops back to zero on a successful accept.
#[derive(Debug, Clone)]
pub struct AcceptBackoff {
    policy: BackoffPolicy,
    current: Duration,
}

impl AcceptBackoff {
    #[must_use]
    pub const fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            current: Duration::ZERO,
        }
    }

    /// Record a transient error and return how long to sleep before retrying.
    pub fn on_error(&mut self) -> Duration {
        self.current = if self.current.is_zero() {
            self.policy.min
        } else {
            self.current.saturating_mul(2)
        };
        if self.current > self.policy.max {
            self.current = self.policy.max;
        }
        self.current
    }

    /// Forget accumulated delay after a successful accept.
    #[inline]
    pub fn reset(&mut self) {
        self.current = Duration::ZERO;
    }

    /// Current delay; zero means no pending backoff.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Duration {
        self.current
    }
}

#[cfg(unix)]
mod os {
    pub const RESOURCE_EXHAUSTION: &[i32] =
        &[libc::ENOMEM, libc::ENFILE, libc::EMFILE, libc::ENOBUFS];
}

#[cfg(windows)]
mod os {
    const WSAEMFILE: i32 = 10024;
    const WSAENOBUFS: i32 = 10055;

    pub const RESOURCE_EXHAUSTION: &[i32] = &[WSAEMFILE, WSAENOBUFS];
}

#[cfg(not(any(unix, windows)))]
mod os {
    pub const RESOURCE_EXHAUSTION: &[i32] = &[];
}

/// Whether an accept error is worth retrying.
///
/// Connection-level failures and resource exhaustion clear up on their own;
/// every other error (including a closed or invalid listener) is permanent.
#[must_use]
pub fn is_transient(err: &io::Error) -> bool {
    match err.kind() {
        io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionRefused
        | io::ErrorKind::Interrupted
        | io::ErrorKind::WouldBlock
        | io::ErrorKind::TimedOut
        | io::ErrorKind::OutOfMemory => true,
        _ => err
            .raw_os_error()
            .is_some_and(|code| os::RESOURCE_EXHAUSTION.contains(&code)),
    }
}
