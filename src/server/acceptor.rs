//! The accept loop shared by both server flavours.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;

use super::close::CloseHandle;
use super::listener::Listener;
use super::observer::Observer;
use crate::backoff::{AcceptBackoff, BackoffPolicy, is_transient};
use crate::error::{Error, Result};

/// Pulls connections out of a [`Listener`], absorbing transient failures.
///
/// Owns the listener and the backoff state for one run of the loop; both are
/// dropped together when the acceptor is.
pub struct Acceptor<L> {
    listener: L,
    backoff: AcceptBackoff,
    closed: watch::Receiver<bool>,
    observer: Arc<dyn Observer>,
}

impl<L: Listener> Acceptor<L> {
    pub fn new(
        listener: L,
        policy: BackoffPolicy,
        close: &CloseHandle,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self {
            listener,
            backoff: AcceptBackoff::new(policy),
            closed: close.subscribe(),
            observer,
        }
    }

    /// Wait for the next connection.
    ///
    /// Transient errors are reported to the observer and retried after the
    /// backoff delay. Returns `Ok(None)` once the server is closed and
    /// `Err` on the first permanent error; the acceptor should not be
    /// polled again after either.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Accept`] for a non-transient accept failure.
    pub async fn next(&mut self) -> Result<Option<(L::Stream, SocketAddr)>> {
        loop {
            let accepted = tokio::select! {
                biased;
                Ok(_) = self.closed.wait_for(|closed| *closed) => None,
                result = self.listener.accept() => Some(result),
            };
            let Some(result) = accepted else {
                self.observer.closed();
                return Ok(None);
            };

            match result {
                Ok(conn) => {
                    self.backoff.reset();
                    return Ok(Some(conn));
                }
                Err(err) if is_transient(&err) => {
                    let delay = self.backoff.on_error();
                    self.observer.accept_error(&err, delay);
                    tokio::select! {
                        biased;
                        Ok(_) = self.closed.wait_for(|closed| *closed) => {
                            self.observer.closed();
                            return Ok(None);
                        }
                        () = tokio::time::sleep(delay) => {}
                    }
                }
                Err(err) => {
                    self.observer.accept_failed(&err);
                    return Err(Error::Accept(err));
                }
            }
        }
    }

    /// Address of the underlying listener.
    ///
    /// # Errors
    ///
    /// Propagates the listener's error.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
