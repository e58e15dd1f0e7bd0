//! Plain TCP server: accept and hand off.

use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};

use super::acceptor::Acceptor;
use super::close::CloseHandle;
use super::handler::{Handler, NoopHandler};
use super::listener::Listener;
use super::observer::{Observer, TracingObserver};
use crate::config::Config;
use crate::error::{Error, Result};

/// Accepts connections and passes each one straight to its handler.
pub struct TcpServer<H = NoopHandler> {
    config: Config,
    handler: H,
    observer: Arc<dyn Observer>,
    close: CloseHandle,
}

impl Default for TcpServer {
    fn default() -> Self {
        Self::new()
    }
}

impl TcpServer {
    /// Create a server with the default configuration and a no-op handler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            handler: NoopHandler,
            observer: Arc::new(TracingObserver),
            close: CloseHandle::new(),
        }
    }
}

impl<H> TcpServer<H> {
    /// Replace the connection handler.
    #[must_use]
    pub fn with_handler<H2>(self, handler: H2) -> TcpServer<H2> {
        TcpServer {
            config: self.config,
            handler,
            observer: self.observer,
            close: self.close,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replace the default `tracing` observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle that stops the accept loop from another task.
    #[must_use]
    pub fn close_handle(&self) -> CloseHandle {
        self.close.clone()
    }

    /// Stop the accept loop; `listen`/`serve` return `Ok(())`.
    pub fn close(&self) {
        self.close.close();
    }

    /// Run the accept loop over an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Accept`] on the first non-transient accept failure.
    pub async fn serve<L>(&mut self, listener: L) -> Result<()>
    where
        L: Listener,
        H: Handler<L::Stream>,
    {
        if let Ok(addr) = listener.local_addr() {
            self.observer.listening(addr);
        }
        let mut acceptor = Acceptor::new(
            listener,
            self.config.backoff,
            &self.close,
            Arc::clone(&self.observer),
        );
        while let Some((stream, peer)) = acceptor.next().await? {
            self.handler.on_accept(stream, peer);
        }
        Ok(())
    }
}

impl<H: Handler<TcpStream>> TcpServer<H> {
    /// Bind `addr` (`host:port`) and run the accept loop until closed or a
    /// permanent accept error occurs.
    ///
    /// # Errors
    ///
    /// - [`Error::Bind`] if the address cannot be bound.
    /// - [`Error::Accept`] on the first non-transient accept failure.
    pub async fn listen(&mut self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr).await.map_err(|source| Error::Bind {
            addr: addr.to_string(),
            source,
        })?;
        self.serve(listener).await
    }
}
