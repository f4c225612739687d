//! Length-prefixed frame encode/decode, split out from the transport so
//! the wire format can be tested without a live pipe.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{DiscordIpcError, ProtocolContext, Result};
use crate::ipc::protocol::{constants, Opcode};

/// A single framed message: `opcode || length || payload`, the length
/// implied by `payload.len()` on the wire and reconstructed from the
/// header on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: Opcode,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(opcode: Opcode, payload: Vec<u8>) -> Self {
        Self { opcode, payload }
    }

    /// Serialize to the `opcode || length || payload` wire form. Errors if
    /// `payload` exceeds [`constants::MAX_OUTBOUND_PAYLOAD_SIZE`].
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.payload.len() as u32 > constants::MAX_OUTBOUND_PAYLOAD_SIZE {
            let context = ProtocolContext {
                expected_opcode: None,
                received_opcode: Some(self.opcode.into()),
                payload_size: Some(self.payload.len()),
            };
            return Err(DiscordIpcError::protocol_violation(
                format!(
                    "outbound payload of {} bytes exceeds the {}-byte limit",
                    self.payload.len(),
                    constants::MAX_OUTBOUND_PAYLOAD_SIZE
                ),
                context,
            ));
        }

        let mut buffer = Vec::with_capacity(constants::IPC_HEADER_SIZE + self.payload.len());
        buffer.write_u32::<LittleEndian>(self.opcode.into())?;
        buffer.write_u32::<LittleEndian>(self.payload.len() as u32)?;
        buffer.extend_from_slice(&self.payload);
        Ok(buffer)
    }

    /// Parse a header previously read off the wire, validating the
    /// advertised length against [`constants::MAX_PAYLOAD_SIZE`] before the
    /// caller reads that many payload bytes.
    pub fn decode_header(header: &[u8; constants::IPC_HEADER_SIZE]) -> Result<(Opcode, u32)> {
        let mut cursor = &header[..];
        let opcode_raw = cursor.read_u32::<LittleEndian>()?;
        let length = cursor.read_u32::<LittleEndian>()?;

        let opcode = Opcode::try_from(opcode_raw)?;

        if length > constants::MAX_PAYLOAD_SIZE {
            let context = ProtocolContext {
                expected_opcode: None,
                received_opcode: Some(opcode_raw),
                payload_size: Some(length as usize),
            };
            return Err(DiscordIpcError::protocol_violation(
                format!(
                    "inbound frame advertises {length} bytes, exceeding the {}-byte limit",
                    constants::MAX_PAYLOAD_SIZE
                ),
                context,
            ));
        }

        Ok((opcode, length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_header_round_trips() {
        let frame = Frame::new(Opcode::Frame, br#"{"cmd":"DISPATCH"}"#.to_vec());
        let encoded = frame.encode().unwrap();

        let mut header = [0u8; constants::IPC_HEADER_SIZE];
        header.copy_from_slice(&encoded[..constants::IPC_HEADER_SIZE]);

        let (opcode, length) = Frame::decode_header(&header).unwrap();
        assert_eq!(opcode, Opcode::Frame);
        assert_eq!(length as usize, frame.payload.len());
        assert_eq!(&encoded[constants::IPC_HEADER_SIZE..], &frame.payload[..]);
    }

    #[test]
    fn decode_header_rejects_oversized_inbound_length() {
        let mut buffer = Vec::new();
        buffer.write_u32::<LittleEndian>(Opcode::Frame.into()).unwrap();
        buffer
            .write_u32::<LittleEndian>(constants::MAX_PAYLOAD_SIZE + 1)
            .unwrap();

        let mut header = [0u8; constants::IPC_HEADER_SIZE];
        header.copy_from_slice(&buffer);

        assert!(Frame::decode_header(&header).is_err());
    }

    #[test]
    fn decode_header_rejects_unknown_opcode() {
        let mut buffer = Vec::new();
        buffer.write_u32::<LittleEndian>(99).unwrap();
        buffer.write_u32::<LittleEndian>(0).unwrap();

        let mut header = [0u8; constants::IPC_HEADER_SIZE];
        header.copy_from_slice(&buffer);

        assert!(Frame::decode_header(&header).is_err());
    }

    #[test]
    fn encode_rejects_oversized_outbound_payload() {
        let frame = Frame::new(
            Opcode::Frame,
            vec![0u8; constants::MAX_OUTBOUND_PAYLOAD_SIZE as usize + 1],
        );
        assert!(frame.encode().is_err());
    }
}
