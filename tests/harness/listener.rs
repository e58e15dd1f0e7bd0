//! Listener that replays a fixed sequence of accept results.

use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use wsaccept::Listener;

/// Yields the scripted results in order, then blocks forever.
///
/// An accept future counts as an attempt once it is first polled.
pub struct ScriptedListener<S> {
    script: VecDeque<io::Result<S>>,
    attempts: Arc<AtomicUsize>,
}

impl<S: Send + 'static> ScriptedListener<S> {
    pub fn new(script: Vec<io::Result<S>>) -> Self {
        Self {
            script: script.into(),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter of accept calls, shared with the listener.
    pub fn attempts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }
}

pub fn peer() -> SocketAddr {
    SocketAddr::from(([10, 0, 0, 1], 50000))
}

impl<S: Send + 'static> Listener for ScriptedListener<S> {
    type Stream = S;

    fn accept(&mut self) -> impl Future<Output = io::Result<(S, SocketAddr)>> + Send {
        async move {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            match self.script.pop_front() {
                Some(result) => result.map(|stream| (stream, peer())),
                None => std::future::pending().await,
            }
        }
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        Ok(SocketAddr::from(([127, 0, 0, 1], 0)))
    }
}
