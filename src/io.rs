//! Output helpers.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Write all of `data`, retrying short writes until nothing is left.
///
/// Returns the first write error. A write that accepts zero bytes is
/// reported as [`io::ErrorKind::WriteZero`] rather than retried.
pub async fn write_full<W>(writer: &mut W, data: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut written = 0;
    while written < data.len() {
        let n = writer.write(&data[written..]).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("wrote {written} of {} bytes", data.len()),
            ));
        }
        written += n;
    }
    writer.flush().await
}
