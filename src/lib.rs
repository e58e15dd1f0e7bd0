//! # wsaccept - TCP accept loop with WebSocket upgrade handshake
//!
//! `wsaccept` accepts inbound TCP connections on a single task and hands each
//! one to a user-supplied handler. In WebSocket mode every connection first
//! goes through the RFC 6455 opening handshake; only upgraded connections
//! reach the handler.
//!
//! ## Features
//!
//! - **Backoff on transient accept errors** (5 ms doubling to a 1 s cap,
//!   reset after every successful accept)
//! - **Strict handshake validation** with one distinct rejection reason per
//!   failure
//! - **Runtime-agnostic protocol core**; the servers live behind the
//!   `async-tokio` feature
//! - **Injected observer** for accept and handshake events, `tracing` by default
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wsaccept::server::{Upgraded, WebSocketServer};
//!
//! let mut server = WebSocketServer::new().with_handler(|conn: Upgraded<_>, peer| {
//!     tokio::spawn(serve_session(conn, peer));
//! });
//! server.listen("0.0.0.0:9001").await?;
//! ```

pub mod backoff;
pub mod config;
pub mod error;
pub mod protocol;

#[cfg(feature = "async-tokio")]
pub mod io;
#[cfg(feature = "async-tokio")]
pub mod server;

pub use backoff::{AcceptBackoff, BackoffPolicy, is_transient};
pub use config::{Config, Limits};
pub use error::{Error, HandshakeError, Result};
pub use protocol::{HandshakeRequest, HandshakeResponse, WS_GUID, compute_accept_key};

#[cfg(feature = "async-tokio")]
pub use server::{
    CloseHandle, Handler, Listener, NoopHandler, Observer, TcpServer, TracingObserver, Upgraded,
    WebSocketServer,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn test_public_types_are_send() {
        assert_send::<Error>();
        assert_send::<HandshakeError>();
        assert_send::<Config>();
        assert_send::<Limits>();
        assert_send::<BackoffPolicy>();
        assert_send::<HandshakeRequest>();
        assert_send::<HandshakeResponse>();
    }

    #[test]
    fn test_public_types_are_sync() {
        assert_sync::<Error>();
        assert_sync::<HandshakeError>();
        assert_sync::<Config>();
        assert_sync::<Limits>();
        assert_sync::<BackoffPolicy>();
    }

    #[cfg(feature = "async-tokio")]
    #[test]
    fn test_servers_are_send() {
        assert_send::<TcpServer>();
        assert_send::<WebSocketServer>();
        assert_send::<CloseHandle>();
        assert_sync::<CloseHandle>();
    }
}
