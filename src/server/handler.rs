//! Hand-off hook for accepted connections.

use std::net::SocketAddr;

/// Receives ownership of each accepted connection.
///
/// Called on the accept task, so a handler that does real work should move
/// the connection into a spawned task and return.
pub trait Handler<C> {
    fn on_accept(&mut self, conn: C, peer: SocketAddr);
}

impl<C, F> Handler<C> for F
where
    F: FnMut(C, SocketAddr),
{
    fn on_accept(&mut self, conn: C, peer: SocketAddr) {
        self(conn, peer)
    }
}

/// Handler that drops every connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl<C> Handler<C> for NoopHandler {
    fn on_accept(&mut self, _conn: C, _peer: SocketAddr) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 4000))
    }

    #[test]
    fn test_closure_handler_receives_ownership() {
        let mut seen = Vec::new();
        {
            let mut handler = |conn: String, peer: SocketAddr| seen.push((conn, peer));
            handler.on_accept("first".to_string(), peer());
            handler.on_accept("second".to_string(), peer());
        }
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "first");
        assert_eq!(seen[1], ("second".to_string(), peer()));
    }

    #[test]
    fn test_noop_handler() {
        let mut handler = NoopHandler;
        Handler::<Vec<u8>>::on_accept(&mut handler, vec![1, 2, 3], peer());
    }
}
