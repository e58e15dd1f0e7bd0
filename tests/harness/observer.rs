//! Observer that records every event for later assertions.

use std::io;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use wsaccept::{HandshakeError, Observer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Listening(SocketAddr),
    AcceptError(io::ErrorKind, Duration),
    AcceptFailed(io::ErrorKind),
    Rejected(SocketAddr, HandshakeError),
    Closed,
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Delays reported for transient accept errors, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::AcceptError(_, delay) => Some(delay),
                _ => None,
            })
            .collect()
    }

    pub fn rejections(&self) -> Vec<HandshakeError> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Rejected(_, err) => Some(err),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Observer for RecordingObserver {
    fn listening(&self, addr: SocketAddr) {
        self.push(Event::Listening(addr));
    }

    fn accept_error(&self, error: &io::Error, delay: Duration) {
        self.push(Event::AcceptError(error.kind(), delay));
    }

    fn accept_failed(&self, error: &io::Error) {
        self.push(Event::AcceptFailed(error.kind()));
    }

    fn handshake_rejected(&self, peer: SocketAddr, error: &HandshakeError) {
        self.push(Event::Rejected(peer, error.clone()));
    }

    fn closed(&self) {
        self.push(Event::Closed);
    }
}
