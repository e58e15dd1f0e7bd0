//! Configuration for the acceptor and the upgrade handshake.

use crate::backoff::BackoffPolicy;
use crate::error::HandshakeError;

/// Resource limits applied while reading an upgrade request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum size of the request head (request line + headers) in bytes.
    ///
    /// Default: 8 KB (8192)
    pub max_handshake_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_handshake_size: 8192,
        }
    }
}

impl Limits {
    /// Create new limits with custom values.
    #[must_use]
    pub const fn new(max_handshake_size: usize) -> Self {
        Self { max_handshake_size }
    }

    /// Validate that handshake size is within limits.
    ///
    /// # Errors
    ///
    /// Returns [`HandshakeError::TooLarge`] if `size` exceeds the configured maximum.
    pub const fn check_handshake_size(&self, size: usize) -> Result<(), HandshakeError> {
        if size > self.max_handshake_size {
            Err(HandshakeError::TooLarge {
                size,
                max: self.max_handshake_size,
            })
        } else {
            Ok(())
        }
    }
}

/// Server configuration shared by the plain and WebSocket acceptors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Handshake limits (WebSocket mode only).
    pub limits: Limits,

    /// Retry delays for transient accept errors.
    pub backoff: BackoffPolicy,
}

impl Config {
    /// Create a new configuration with default limits and backoff.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom limits.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set a custom backoff policy.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }
}
