//! Wire format
//!
//! Messages are length-prefixed: a big-endian `u32` payload length followed
//! by the payload bytes. A zero-length payload is a valid (empty) message,
//! distinct from end-of-stream.
//!
//! Presence announcements are one-byte payloads carrying a marker: `1` for
//! subscribe, `0` for unsubscribe. The marker is transport bookkeeping, not
//! application data.

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::TransportError;

/// Leading byte of a subscribe announcement
pub const SUBSCRIBE_MARKER: u8 = 1;

/// Leading byte of an unsubscribe announcement
pub const UNSUBSCRIBE_MARKER: u8 = 0;

/// Maximum accepted payload size (16 MiB)
///
/// Large enough for any plausible compressed frame; rejects garbage length
/// prefixes before they turn into huge allocations.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Write one length-prefixed message
///
/// Oversize payloads are rejected before anything hits the socket; a
/// reader would refuse them anyway, and the length prefix must not wrap.
pub async fn write_message<W>(writer: &mut W, payload: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_MESSAGE_SIZE {
        return Err(oversize(payload.len()));
    }

    writer.write_u32(payload.len() as u32).await?;
    writer.write_all(payload).await?;
    writer.flush().await
}

fn oversize(size: usize) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        TransportError::MessageTooLarge {
            size,
            max: MAX_MESSAGE_SIZE,
        },
    )
}

/// Read one length-prefixed message
///
/// Returns `Ok(None)` on a clean end-of-stream at a message boundary.
/// An end-of-stream mid-message is an error.
pub async fn read_message<R>(reader: &mut R) -> std::io::Result<Option<Bytes>>
where
    R: AsyncRead + Unpin,
{
    let len = match reader.read_u32().await {
        Ok(len) => len as usize,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    };

    if len > MAX_MESSAGE_SIZE {
        return Err(oversize(len));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(Bytes::from(payload)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        write_message(&mut client, b"hello").await.unwrap();
        let msg = read_message(&mut server).await.unwrap().unwrap();
        assert_eq!(&msg[..], b"hello");
    }

    #[tokio::test]
    async fn test_empty_message_is_not_eof() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        write_message(&mut client, b"").await.unwrap();
        let msg = read_message(&mut server).await.unwrap();
        assert_eq!(msg, Some(Bytes::new()));
    }

    #[tokio::test]
    async fn test_eof_at_boundary() {
        let (client, mut server) = tokio::io::duplex(1024);
        drop(client);

        let msg = read_message(&mut server).await.unwrap();
        assert!(msg.is_none());
    }

    #[tokio::test]
    async fn test_oversize_length_rejected() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        client
            .write_u32((MAX_MESSAGE_SIZE + 1) as u32)
            .await
            .unwrap();

        let err = read_message(&mut server).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        let source = err.get_ref().unwrap().downcast_ref::<TransportError>();
        assert!(matches!(
            source,
            Some(TransportError::MessageTooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn test_oversize_payload_rejected_on_write() {
        let (mut client, _server) = tokio::io::duplex(1024);

        let payload = vec![0u8; MAX_MESSAGE_SIZE + 1];
        let err = write_message(&mut client, &payload).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        let source = err.get_ref().unwrap().downcast_ref::<TransportError>();
        assert!(matches!(
            source,
            Some(TransportError::MessageTooLarge { size, max })
                if *size == MAX_MESSAGE_SIZE + 1 && *max == MAX_MESSAGE_SIZE
        ));
    }

    #[tokio::test]
    async fn test_truncated_payload_is_error() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        client.write_u32(10).await.unwrap();
        client.write_all(b"abc").await.unwrap();
        drop(client);

        assert!(read_message(&mut server).await.is_err());
    }

    #[tokio::test]
    async fn test_sequential_messages() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        write_message(&mut client, &[SUBSCRIBE_MARKER]).await.unwrap();
        write_message(&mut client, &[UNSUBSCRIBE_MARKER]).await.unwrap();

        let first = read_message(&mut server).await.unwrap().unwrap();
        let second = read_message(&mut server).await.unwrap().unwrap();
        assert_eq!(first[0], SUBSCRIBE_MARKER);
        assert_eq!(second[0], UNSUBSCRIBE_MARKER);
    }
}
