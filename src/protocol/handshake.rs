//! WebSocket opening handshake, server side (RFC 6455 section 4.2).
//!
//! Validation runs in a fixed order and stops at the first failure, so a
//! request with several problems is always rejected for the same reason.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use sha1::{Digest, Sha1};

use crate::error::HandshakeError;
use crate::protocol::request::{Request, RequestLine};
use crate::protocol::uri::{parse_reference, parse_request_uri};

/// The WebSocket GUID used in the Sec-WebSocket-Accept calculation (RFC 6455).
pub const WS_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Length of a base64-encoded SHA-1 digest, padding included.
pub const ACCEPT_KEY_LEN: usize = 28;

/// The only protocol version this server speaks.
pub const SUPPORTED_VERSION: &str = "13";

/// Computes the Sec-WebSocket-Accept value from the client's Sec-WebSocket-Key.
///
/// The accept key is calculated as: Base64(SHA-1(key + GUID))
///
/// # Example
///
/// ```
/// use wsaccept::protocol::handshake::compute_accept_key;
///
/// let key = "dGhlIHNhbXBsZSBub25jZQ==";
/// let accept = compute_accept_key(key);
/// assert_eq!(accept, "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
/// ```
pub fn compute_accept_key(key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(key.as_bytes());
    hasher.update(WS_GUID.as_bytes());
    let hash = hasher.finalize();
    BASE64.encode(hash)
}

/// Generate a fresh Sec-WebSocket-Key (16 random bytes, base64).
///
/// # Errors
///
/// Returns an error if the OS random source is unavailable.
pub fn generate_key() -> std::io::Result<String> {
    let mut nonce = [0u8; 16];
    getrandom::getrandom(&mut nonce).map_err(std::io::Error::from)?;
    Ok(BASE64.encode(nonce))
}

/// Split a `Sec-WebSocket-Protocol` value into trimmed candidates.
///
/// A blank value yields no candidates.
#[must_use]
pub fn split_protocols(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(|p| p.trim().to_string()).collect()
}

fn check_method(line: &RequestLine) -> Result<(), HandshakeError> {
    if line.method != "GET" {
        return Err(HandshakeError::InvalidMethod(line.method.clone()));
    }
    Ok(())
}

/// A validated upgrade request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeRequest {
    /// The request target (e.g., "/chat").
    pub path: String,
    /// The Host header value.
    pub host: String,
    /// The Sec-WebSocket-Key header value.
    pub key: String,
    /// The Origin header value.
    pub origin: String,
    /// The single subprotocol the client offered, if any.
    pub protocol: Option<String>,
}

impl HandshakeRequest {
    /// Validate a parsed request as a WebSocket upgrade.
    ///
    /// # Errors
    ///
    /// Checks run in this order, returning the first failure:
    /// 1. [`HandshakeError::InvalidMethod`] if the method is not `GET`.
    /// 2. [`HandshakeError::NotWebSocketProtocol`] if `Upgrade` is not
    ///    `websocket` or `Connection` does not contain `upgrade`.
    /// 3. [`HandshakeError::MissingKey`] if `Sec-WebSocket-Key` is absent or empty.
    /// 4. [`HandshakeError::UnsupportedVersion`] if `Sec-WebSocket-Version` is not `13`.
    /// 5. [`HandshakeError::AmbiguousProtocol`] if more than one subprotocol is offered.
    /// 6. [`HandshakeError::NullOrigin`] / [`HandshakeError::InvalidOrigin`] for a
    ///    missing `Origin` or one that is not a request URI.
    /// 7. [`HandshakeError::ForbiddenPath`] if `Host` is empty or `ws://` + `Host`
    ///    + target is not a well-formed URI reference.
    pub fn from_request(req: &Request) -> Result<Self, HandshakeError> {
        if req.method != "GET" {
            return Err(HandshakeError::InvalidMethod(req.method.clone()));
        }

        let headers = &req.headers;

        let upgrade = headers.get("Upgrade").unwrap_or_default();
        let connection = headers.get("Connection").unwrap_or_default();
        if !upgrade.eq_ignore_ascii_case("websocket")
            || !connection.to_ascii_lowercase().contains("upgrade")
        {
            return Err(HandshakeError::NotWebSocketProtocol);
        }

        let key = headers.get("Sec-WebSocket-Key").unwrap_or_default();
        if key.is_empty() {
            return Err(HandshakeError::MissingKey);
        }

        let version = headers.get("Sec-WebSocket-Version").unwrap_or_default();
        if version != SUPPORTED_VERSION {
            return Err(HandshakeError::UnsupportedVersion(version.to_string()));
        }

        let mut protocols =
            split_protocols(headers.get("Sec-WebSocket-Protocol").unwrap_or_default());
        if protocols.len() > 1 {
            return Err(HandshakeError::AmbiguousProtocol(protocols.len()));
        }

        let origin = headers.get("Origin").unwrap_or_default();
        if origin.is_empty() {
            return Err(HandshakeError::NullOrigin);
        }
        if parse_request_uri(origin).is_err() {
            return Err(HandshakeError::InvalidOrigin(origin.to_string()));
        }

        let host = headers.get("Host").unwrap_or_default();
        let address = format!("ws://{host}{}", req.target);
        if host.is_empty() || parse_reference(&address).is_err() {
            return Err(HandshakeError::ForbiddenPath(address));
        }

        Ok(Self {
            path: req.target.clone(),
            host: host.to_string(),
            key: key.to_string(),
            origin: origin.to_string(),
            protocol: protocols.pop(),
        })
    }

    /// Parse and validate a request head in one step.
    ///
    /// The method is checked as soon as the request line is read, so a
    /// non-GET request is reported as such even if its headers are broken.
    ///
    /// # Errors
    ///
    /// Any parse error from [`Request::parse_checked`] or validation error
    /// from [`HandshakeRequest::from_request`].
    pub fn parse(data: &[u8]) -> Result<Self, HandshakeError> {
        Self::from_request(&Request::parse_checked(data, check_method)?)
    }
}

/// The `101 Switching Protocols` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeResponse {
    /// The Sec-WebSocket-Accept value.
    pub accept: String,
    /// The negotiated Sec-WebSocket-Protocol (optional).
    pub protocol: Option<String>,
}

impl HandshakeResponse {
    /// Create a handshake response from a validated request.
    ///
    /// # Errors
    ///
    /// Returns [`HandshakeError::AcceptToken`] if the computed token does not
    /// have the length of an encoded SHA-1 digest.
    pub fn from_request(req: &HandshakeRequest) -> Result<Self, HandshakeError> {
        let accept = compute_accept_key(&req.key);
        if accept.len() != ACCEPT_KEY_LEN {
            return Err(HandshakeError::AcceptToken(format!(
                "expected {ACCEPT_KEY_LEN} characters, got {}",
                accept.len()
            )));
        }
        Ok(Self {
            accept,
            protocol: req.protocol.clone(),
        })
    }

    /// Write the HTTP response to a buffer.
    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(b"HTTP/1.1 101 Switching Protocols\r\n");
        buf.extend_from_slice(b"Upgrade: websocket\r\n");
        buf.extend_from_slice(b"Connection: Upgrade\r\n");
        buf.extend_from_slice(format!("Sec-WebSocket-Accept: {}\r\n", self.accept).as_bytes());
        if let Some(ref proto) = self.protocol {
            buf.extend_from_slice(format!("Sec-WebSocket-Protocol: {proto}\r\n").as_bytes());
        }
        buf.extend_from_slice(b"\r\n");
    }
}

/// Parse, validate and answer a complete request head.
///
/// # Errors
///
/// The first parse or validation failure, see [`HandshakeRequest::from_request`].
pub fn negotiate(head: &[u8]) -> Result<HandshakeResponse, HandshakeError> {
    let request = HandshakeRequest::parse(head)?;
    HandshakeResponse::from_request(&request)
}

/// Write the `400 Bad Request` rejection for `err`.
///
/// The error text follows the `Connection` field name directly, with no
/// separator and no terminating CRLF. Existing clients see exactly these
/// bytes, so the layout is kept as is.
pub fn write_rejection(buf: &mut Vec<u8>, err: &HandshakeError) {
    buf.extend_from_slice(b"HTTP/1.1 400 Bad Request\r\n");
    buf.extend_from_slice(b"Content-Type: text/plain; charset=utf-8\r\n");
    buf.extend_from_slice(b"Connection");
    buf.extend_from_slice(err.to_string().as_bytes());
}
