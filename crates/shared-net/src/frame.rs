//! Frame encoding.
//!
//! Every message on the wire is an opcode-tagged, length-prefixed frame:
//!
//! ```text
//! [1 byte: opcode] [4 bytes: payload length (u32-le)] [N bytes: bincode payload]
//! ```
//!
//! The reader validates the length against `max_msg_size` before allocating.

use shared_types::{CodecError, Opcode, WireMessage};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::NetError;

/// Size of the frame header in bytes.
pub const HEADER_LEN: usize = 5;

/// One decoded frame: opcode plus raw message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: Opcode,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Encode a message body into a frame.
    pub fn from_message<M: WireMessage>(msg: &M) -> Result<Self, NetError> {
        Ok(Self {
            opcode: M::OPCODE,
            payload: msg.encode()?,
        })
    }

    /// Decode the body as `M`, checking the opcode.
    pub fn decode<M: WireMessage>(&self) -> Result<M, CodecError> {
        M::decode_tagged(self.opcode, &self.payload)
    }

    /// Serialize header and payload, refusing payloads above `max_size`.
    pub fn to_bytes(&self, max_size: usize) -> Result<Vec<u8>, NetError> {
        if self.payload.len() > max_size {
            return Err(NetError::MessageTooLarge {
                size: self.payload.len(),
                max: max_size,
            });
        }
        let len = u32::try_from(self.payload.len()).map_err(|_| NetError::MessageTooLarge {
            size: self.payload.len(),
            max: max_size,
        })?;
        let mut buf = Vec::with_capacity(HEADER_LEN.saturating_add(self.payload.len()));
        buf.push(self.opcode);
        buf.extend_from_slice(&len.to_le_bytes());
        buf.extend_from_slice(&self.payload);
        Ok(buf)
    }
}

/// Split a header into opcode and payload length.
#[must_use]
pub fn parse_header(header: &[u8; HEADER_LEN]) -> (Opcode, usize) {
    let len = u32::from_le_bytes([header[1], header[2], header[3], header[4]]);
    (header[0], len as usize)
}

/// Read one frame.
///
/// Returns `Ok(None)` when the peer closed the stream between frames.
pub async fn read_frame<R>(reader: &mut R, max_size: usize) -> Result<Option<Frame>, NetError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    if let Err(e) = reader.read_exact(&mut header).await {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            return Ok(None);
        }
        return Err(e.into());
    }

    let (opcode, len) = parse_header(&header);
    if len > max_size {
        return Err(NetError::MessageTooLarge {
            size: len,
            max: max_size,
        });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(Frame { opcode, payload }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Command, ReqCmd};

    #[test]
    fn test_header_layout() {
        let frame = Frame {
            opcode: 0x04,
            payload: vec![9; 3],
        };
        let bytes = frame.to_bytes(1024).unwrap();
        assert_eq!(bytes, vec![0x04, 3, 0, 0, 0, 9, 9, 9]);
        let header: [u8; HEADER_LEN] = bytes[..HEADER_LEN].try_into().unwrap();
        assert_eq!(parse_header(&header), (0x04, 3));
    }

    #[test]
    fn test_oversized_payload_refused() {
        let frame = Frame {
            opcode: 0x04,
            payload: vec![0; 17],
        };
        assert!(matches!(
            frame.to_bytes(16),
            Err(NetError::MessageTooLarge { size: 17, max: 16 })
        ));
    }

    #[tokio::test]
    async fn test_read_frame_from_stream() {
        let frame = Frame::from_message(&ReqCmd::new(Command::new(2, 5))).unwrap();
        let mut bytes = frame.to_bytes(1024).unwrap();
        bytes.extend(frame.to_bytes(1024).unwrap());
        let mut reader = bytes.as_slice();

        let first = read_frame(&mut reader, 1024).await.unwrap().unwrap();
        assert_eq!(first.decode::<ReqCmd>().unwrap().cmd, Command::new(2, 5));
        assert!(read_frame(&mut reader, 1024).await.unwrap().is_some());
        assert!(read_frame(&mut reader, 1024).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_frame_rejects_oversized_header() {
        let bytes = [0x05u8, 0xff, 0xff, 0x00, 0x00];
        let mut reader = &bytes[..];
        assert!(matches!(
            read_frame(&mut reader, 1024).await,
            Err(NetError::MessageTooLarge { size: 65_535, .. })
        ));
    }
}
