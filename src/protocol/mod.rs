//! Upgrade handshake core (RFC 6455), independent of any I/O runtime.

pub mod handshake;
pub mod request;
pub mod uri;

pub use handshake::{
    HandshakeRequest, HandshakeResponse, WS_GUID, compute_accept_key, generate_key, negotiate,
    split_protocols, write_rejection,
};
pub use request::{Headers, Request, RequestLine, find_head_end, parse_header_line};
pub use uri::{UriError, parse_reference, parse_request_uri};
