//! Event sink for acceptor activity.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::HandshakeError;

/// Receives acceptor events. Every method defaults to doing nothing.
pub trait Observer: Send + Sync {
    /// The listener is bound and the accept loop is starting.
    fn listening(&self, _addr: SocketAddr) {}

    /// A transient accept error; the loop sleeps `delay` before retrying.
    fn accept_error(&self, _error: &io::Error, _delay: Duration) {}

    /// A permanent accept error; the loop is about to return it.
    fn accept_failed(&self, _error: &io::Error) {}

    /// An upgrade request was rejected and its connection dropped.
    fn handshake_rejected(&self, _peer: SocketAddr, _error: &HandshakeError) {}

    /// The loop stopped because the server was closed.
    fn closed(&self) {}
}

/// Default observer, emitting `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn listening(&self, addr: SocketAddr) {
        tracing::info!(address = %addr, "listening");
    }

    fn accept_error(&self, error: &io::Error, delay: Duration) {
        tracing::warn!(%error, retry_in = ?delay, "accept error");
    }

    fn accept_failed(&self, error: &io::Error) {
        tracing::error!(%error, "accept failed, stopping");
    }

    fn handshake_rejected(&self, peer: SocketAddr, error: &HandshakeError) {
        tracing::debug!(peer_addr = %peer, %error, "handshake rejected");
    }

    fn closed(&self) {
        tracing::debug!("listener closed");
    }
}
