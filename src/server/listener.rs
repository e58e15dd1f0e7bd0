//! Source of inbound connections.

use std::future::Future;
use std::io;
use std::net::SocketAddr;

/// Something that yields accepted connections.
///
/// Implemented for [`tokio::net::TcpListener`]; other implementations let the
/// accept loop run over in-memory transports.
pub trait Listener {
    /// Connection type handed out by `accept`.
    type Stream;

    /// Wait for the next inbound connection.
    fn accept(&mut self) -> impl Future<Output = io::Result<(Self::Stream, SocketAddr)>> + Send;

    /// Address the listener is bound to.
    fn local_addr(&self) -> io::Result<SocketAddr>;
}

impl Listener for tokio::net::TcpListener {
    type Stream = tokio::net::TcpStream;

    fn accept(&mut self) -> impl Future<Output = io::Result<(Self::Stream, SocketAddr)>> + Send {
        tokio::net::TcpListener::accept(self)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        tokio::net::TcpListener::local_addr(self)
    }
}
