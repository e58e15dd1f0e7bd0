//! Error types for the acceptor and the upgrade handshake.
//!
//! Handshake failures are local to one connection and never stop the accept
//! loop; [`Error`] covers the conditions that do.

use thiserror::Error;

/// Result type alias for acceptor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal acceptor errors returned from `listen`/`serve`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address passed to `listen`.
        addr: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Accept failed with an error that is not retryable.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),
}

/// Reasons an upgrade request is rejected.
///
/// The `Display` text of each variant is what the client receives in the
/// `400 Bad Request` response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandshakeError {
    /// Request line has fewer than two spaces.
    #[error("malformed HTTP request: {0}")]
    MalformedRequest(String),

    /// Header line without a colon.
    #[error("malformed header line: {0}")]
    MalformedHeader(String),

    /// Method other than `GET`.
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// `Upgrade` or `Connection` header does not request a WebSocket upgrade.
    #[error("not websocket protocol")]
    NotWebSocketProtocol,

    /// `Sec-WebSocket-Key` absent or empty.
    #[error("missing Sec-WebSocket-Key")]
    MissingKey,

    /// `Sec-WebSocket-Version` is not `13`.
    #[error("missing or bad WebSocket version: {0:?}")]
    UnsupportedVersion(String),

    /// More than one subprotocol offered.
    #[error("missing or bad WebSocket-Protocol: {0} candidates offered")]
    AmbiguousProtocol(usize),

    /// `Origin` absent or empty.
    #[error("null origin")]
    NullOrigin,

    /// `Origin` is not an absolute request URI.
    #[error("invalid origin: {0}")]
    InvalidOrigin(String),

    /// `ws://` + `Host` + request target is not a valid URI.
    #[error("path forbidden: {0}")]
    ForbiddenPath(String),

    /// The computed `Sec-WebSocket-Accept` token is malformed.
    #[error("accept token: {0}")]
    AcceptToken(String),

    /// Request head exceeds the configured limit.
    #[error("handshake too large: {size} bytes (max: {max})")]
    TooLarge {
        /// Bytes received so far.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Reading the request or writing the response failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for HandshakeError {
    fn from(err: std::io::Error) -> Self {
        HandshakeError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_error_display() {
        assert_eq!(
            HandshakeError::NotWebSocketProtocol.to_string(),
            "not websocket protocol"
        );
        assert_eq!(
            HandshakeError::UnsupportedVersion("8".into()).to_string(),
            "missing or bad WebSocket version: \"8\""
        );
        assert_eq!(
            HandshakeError::TooLarge {
                size: 9000,
                max: 8192
            }
            .to_string(),
            "handshake too large: 9000 bytes (max: 8192)"
        );
    }

    #[test]
    fn test_handshake_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "early eof");
        let err: HandshakeError = io_err.into();
        assert!(matches!(err, HandshakeError::Io(msg) if msg.contains("early eof")));
    }

    #[test]
    fn test_bind_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::Bind {
            addr: "127.0.0.1:1".into(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert!(err.to_string().starts_with("failed to bind 127.0.0.1:1"));
        assert!(err.source().is_some());
    }
}
