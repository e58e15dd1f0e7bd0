//! Shutdown signal for a running accept loop.

use std::sync::Arc;

use tokio::sync::watch;

/// Closes the listener of a running (or not yet started) server.
///
/// Closing wakes a pending accept or backoff sleep and the loop returns
/// `Ok(())`. A handshake already in progress runs to completion first.
#[derive(Debug, Clone)]
pub struct CloseHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CloseHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CloseHandle {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Signal the accept loop to stop.
    pub fn close(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.tx.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
