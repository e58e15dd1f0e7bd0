//! Accept loops for plain TCP and WebSocket-upgrading servers.
//!
//! Both servers run a single accept loop: each connection is accepted,
//! optionally put through the upgrade handshake on the same task, and then
//! handed to a [`Handler`]. A handler that wants concurrency spawns its own
//! task per connection.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wsaccept::server::{Upgraded, WebSocketServer};
//! use tokio::net::TcpStream;
//!
//! # async fn run() -> wsaccept::Result<()> {
//! let mut server = WebSocketServer::new().with_handler(
//!     |conn: Upgraded<TcpStream>, peer: std::net::SocketAddr| {
//!         tokio::spawn(async move {
//!             println!("{peer} upgraded, protocol {:?}", conn.protocol);
//!         });
//!     },
//! );
//! server.listen("127.0.0.1:9001").await
//! # }
//! ```

mod acceptor;
mod close;
mod handler;
mod listener;
mod observer;
mod tcp;
mod upgrade;
mod websocket;

pub use acceptor::Acceptor;
pub use close::CloseHandle;
pub use handler::{Handler, NoopHandler};
pub use listener::Listener;
pub use observer::{Observer, TracingObserver};
pub use tcp::TcpServer;
pub use upgrade::{Upgraded, upgrade};
pub use websocket::WebSocketServer;
