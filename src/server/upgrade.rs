//! Server side of the upgrade handshake over an async stream.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::config::Limits;
use crate::error::HandshakeError;
use crate::io::write_full;
use crate::protocol::handshake::{negotiate, write_rejection};
use crate::protocol::request::find_head_end;

/// A connection that completed the upgrade handshake.
#[derive(Debug)]
pub struct Upgraded<S> {
    /// The raw connection, positioned after the request head.
    pub stream: S,
    /// Subprotocol echoed back to the client, if one was offered.
    pub protocol: Option<String>,
    /// Bytes the client sent after the request head.
    ///
    /// These were read off `stream` together with the head and belong in
    /// front of anything read from it next.
    pub read_buf: Bytes,
}

impl<S> Upgraded<S> {
    #[must_use]
    pub fn into_parts(self) -> (S, Bytes) {
        (self.stream, self.read_buf)
    }
}

/// Run the upgrade handshake on a freshly accepted stream.
///
/// Reads one request head, validates it and writes either the
/// `101 Switching Protocols` response or a `400 Bad Request` rejection.
/// On rejection the stream is dropped, closing the connection.
///
/// # Errors
///
/// The [`HandshakeError`] that caused the rejection, or
/// [`HandshakeError::Io`] if the 101 response could not be written.
pub async fn upgrade<S>(mut stream: S, limits: &Limits) -> Result<Upgraded<S>, HandshakeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let negotiated = match read_head(&mut stream, limits).await {
        Ok((head, rest)) => negotiate(&head).map(|response| (response, rest)),
        Err(err) => Err(err),
    };

    match negotiated {
        Ok((response, read_buf)) => {
            let mut buf = Vec::with_capacity(160);
            response.write(&mut buf);
            write_full(&mut stream, &buf).await?;
            Ok(Upgraded {
                stream,
                protocol: response.protocol,
                read_buf,
            })
        }
        Err(err) => {
            let mut buf = Vec::new();
            write_rejection(&mut buf, &err);
            // The peer may already be gone; the original error is what matters.
            let _ = write_full(&mut stream, &buf).await;
            Err(err)
        }
    }
}

/// Read until the end of the request head, returning the head and any
/// bytes that arrived after it.
async fn read_head<S>(stream: &mut S, limits: &Limits) -> Result<(BytesMut, Bytes), HandshakeError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(1024);
    loop {
        if let Some(end) = find_head_end(&buf) {
            limits.check_handshake_size(end)?;
            let head = buf.split_to(end);
            return Ok((head, buf.freeze()));
        }
        limits.check_handshake_size(buf.len())?;

        if stream.read_buf(&mut buf).await? == 0 {
            return Err(HandshakeError::Io(
                "connection closed before end of request head".into(),
            ));
        }
    }
}
