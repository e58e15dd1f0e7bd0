//! WebSocket upgrade server example.
//!
//! Run with: cargo run --example upgrade_server
//! Then connect with any WebSocket client to ws://127.0.0.1:9001/ and an
//! `Origin` header. Upgraded connections are echoed back byte for byte.

use std::error::Error;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wsaccept::{Upgraded, WebSocketServer};

const ADDR: &str = "127.0.0.1:9001";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let mut server = WebSocketServer::new().with_handler(
        |conn: Upgraded<TcpStream>, peer: SocketAddr| {
            info!(peer_addr = %peer, protocol = ?conn.protocol, "upgraded");
            tokio::spawn(async move {
                if let Err(e) = echo(conn).await {
                    warn!(peer_addr = %peer, error = %e, "session ended with error");
                }
            });
        },
    );

    let close = server.close_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            close.close();
        }
    });

    server.listen(ADDR).await?;
    info!("server stopped");
    Ok(())
}

async fn echo(conn: Upgraded<TcpStream>) -> std::io::Result<()> {
    let (mut stream, pending) = conn.into_parts();
    stream.write_all(&pending).await?;

    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        stream.write_all(&buf[..n]).await?;
    }
}
