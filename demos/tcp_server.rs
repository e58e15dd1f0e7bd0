//! Plain TCP accept loop example.
//!
//! Run with: cargo run --example tcp_server
//! Each connection gets a greeting and is then closed.

use std::error::Error;
use std::net::SocketAddr;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wsaccept::TcpServer;

const ADDR: &str = "127.0.0.1:9000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut server = TcpServer::new().with_handler(|mut stream: TcpStream, peer: SocketAddr| {
        info!(peer_addr = %peer, "accepted");
        tokio::spawn(async move {
            let _ = stream.write_all(b"hello\r\n").await;
        });
    });

    server.listen(ADDR).await?;
    Ok(())
}
