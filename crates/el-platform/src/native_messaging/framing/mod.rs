//! Native messaging framing: a u32 length prefix in native byte order, then UTF-8 JSON.

use anyhow::{anyhow, Result};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{trace, warn};

/// Largest message the browser accepts from a native host (1 MiB).
pub const MAX_NATIVE_MESSAGE_BYTES: usize = 1024 * 1024;

/// Write one length-prefixed message to the provided async writer.
pub async fn write_message<W>(writer: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_NATIVE_MESSAGE_BYTES {
        return Err(anyhow!(
            "message exceeds max: {} > {}",
            payload.len(),
            MAX_NATIVE_MESSAGE_BYTES
        ));
    }
    let len = payload.len() as u32;

    trace!(stage = "write_len_prefix", len = len, "writing message length");
    writer.write_all(&len.to_ne_bytes()).await?;

    trace!(stage = "write_payload", len = len, "writing message payload");
    writer.write_all(payload).await?;

    writer.flush().await?;
    Ok(())
}

/// Read a single length-prefixed message enforcing an upper bound.
///
/// Returns `Ok(None)` if the stream ends cleanly before the length prefix.
pub async fn read_message<R>(reader: &mut R, max_message_bytes: usize) -> Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    trace!(stage = "read_len_prefix", "reading message length");

    let n = reader.read(&mut len_buf).await?;
    if n == 0 {
        return Ok(None);
    }
    if n < 4 {
        if let Err(e) = reader.read_exact(&mut len_buf[n..]).await {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                warn!(
                    stage = "read_len_prefix",
                    error = %e,
                    expected = 4,
                    read = n,
                    "unexpected eof reading length"
                );
            }
            return Err(e.into());
        }
    }

    let len = u32::from_ne_bytes(len_buf) as usize;
    if len > max_message_bytes {
        return Err(anyhow!("message exceeds max: {} > {}", len, max_message_bytes));
    }

    let mut buf = vec![0u8; len];
    trace!(stage = "read_payload", len = len, "reading message payload");
    if let Err(e) = reader.read_exact(&mut buf).await {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            warn!(
                stage = "read_payload",
                error = %e,
                expected = len,
                "unexpected eof reading payload"
            );
        }
        return Err(e.into());
    }
    Ok(Some(buf))
}
