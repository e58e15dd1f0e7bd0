//! Raw TCP client speaking just enough HTTP to drive the handshake.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use wsaccept::protocol::generate_key;

/// A valid upgrade request with the RFC 6455 sample key.
pub fn valid_request() -> String {
    request(&[])
}

/// A fresh random Sec-WebSocket-Key.
pub fn random_key() -> String {
    generate_key().unwrap()
}

/// Build an upgrade request for `/chat`, overriding or removing headers.
///
/// `(name, None)` removes the header, `(name, Some(value))` replaces or adds it.
pub fn request(overrides: &[(&str, Option<&str>)]) -> String {
    request_to("/chat", overrides)
}

/// Build an upgrade request for an arbitrary request-target.
pub fn request_to(target: &str, overrides: &[(&str, Option<&str>)]) -> String {
    let mut headers = vec![
        ("Host", "example.com".to_string()),
        ("Upgrade", "websocket".to_string()),
        ("Connection", "Upgrade".to_string()),
        ("Sec-WebSocket-Key", "dGhlIHNhbXBsZSBub25jZQ==".to_string()),
        ("Sec-WebSocket-Version", "13".to_string()),
        ("Origin", "http://example.com".to_string()),
    ];
    for (name, value) in overrides {
        headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        if let Some(value) = value {
            headers.push((*name, value.to_string()));
        }
    }

    let mut out = format!("GET {target} HTTP/1.1\r\n");
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    out
}

/// Value of the first response header called `name`, ignoring case.
pub fn header_value<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    response.split("\r\n").skip(1).find_map(|line| {
        let (n, v) = line.split_once(':')?;
        n.eq_ignore_ascii_case(name).then(|| v.trim())
    })
}

/// Read until the end of a response head or EOF, whichever comes first.
pub async fn read_response(stream: &mut TcpStream) -> String {
    let read = async {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 512];
        loop {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        String::from_utf8(buf).unwrap()
    };
    tokio::time::timeout(Duration::from_secs(5), read)
        .await
        .expect("response timed out")
}

/// Connect, send `request` and return the stream plus the response text.
pub async fn send_request(addr: SocketAddr, request: &str) -> (TcpStream, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let response = read_response(&mut stream).await;
    (stream, response)
}
