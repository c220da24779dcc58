//! Message encoding and decoding
//!
//! Every message is a fixed-size packed structure: the 4-byte common header
//! followed by a kind-specific payload (see crate docs for the layout).
//! Encoding always produces exactly the kind's wire size; decoding verifies
//! the protocol version and payload length and otherwise has no side
//! effects.

use crate::peer::PeerAddr;
use heapless::Vec;

/// Protocol version carried in every header
pub const PROTOCOL_VERSION: u8 = 1;

/// Common header size: version + kind + sequence
pub const HEADER_LEN: usize = 4;

/// Size of the largest message on the wire (pairing messages)
pub const MAX_MESSAGE_LEN: usize = HEADER_LEN + PeerAddr::LEN;

// Message kind identifiers
pub const KIND_LIGHT_COMMAND: u8 = 0x01;
pub const KIND_LIGHT_ACK: u8 = 0x02;
pub const KIND_HEARTBEAT: u8 = 0x03;
pub const KIND_STATE_REPORT: u8 = 0x04;
pub const KIND_PAIR_REQUEST: u8 = 0x10;
pub const KIND_PAIR_RESPONSE: u8 = 0x11;

/// Errors from encoding a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Destination buffer smaller than the message's wire size
    BufferTooSmall,
}

/// Errors from decoding a message
///
/// `Truncated` and `VersionMismatch` carry the header fields that were
/// readable so a receiver can answer a broken command with the matching
/// non-Ok ack status instead of dropping it blind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Buffer smaller than the common header
    TooShort,
    /// Header valid but the payload is shorter than the kind requires
    Truncated { kind: u8, seq: u16 },
    /// Header version differs from [`PROTOCOL_VERSION`]
    VersionMismatch { version: u8, kind: u8, seq: u16 },
}

/// Status codes reported in a [`Message::LightAck`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckStatus {
    /// Command applied
    Ok,
    /// Command payload was malformed
    InvalidPayload,
    /// Command carried an incompatible protocol version
    VersionMismatch,
}

// Wire format values
const STATUS_OK: u8 = 0x00;
const STATUS_INVALID: u8 = 0x01;
const STATUS_VERSION: u8 = 0x02;

impl AckStatus {
    /// Parse a status from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            STATUS_OK => Some(AckStatus::Ok),
            STATUS_INVALID => Some(AckStatus::InvalidPayload),
            STATUS_VERSION => Some(AckStatus::VersionMismatch),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            AckStatus::Ok => STATUS_OK,
            AckStatus::InvalidPayload => STATUS_INVALID,
            AckStatus::VersionMismatch => STATUS_VERSION,
        }
    }
}

/// A protocol message with its sequence number
///
/// Sequence numbers are allocated per-sender and wrap; acks echo the
/// sequence of the command they answer rather than allocating their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    /// Controller → receiver: set the masked light bits
    LightCommand { seq: u16, mask: u8, state: u8 },
    /// Receiver → controller: confirmed state of ALL lights
    LightAck { seq: u16, light_state: u8, status: AckStatus },
    /// Receiver → controller: periodic keep-alive
    Heartbeat { seq: u16, light_state: u8 },
    /// Receiver → controller: full state plus uptime
    StateReport { seq: u16, light_state: u8, uptime_ms: u32 },
    /// Controller → all receivers (broadcast): pairing request
    PairRequest { seq: u16, sender_id: PeerAddr },
    /// Receiver → controller: pairing response
    PairResponse { seq: u16, responder_id: PeerAddr },
}

impl Message {
    /// Wire kind identifier for this message
    pub fn kind(&self) -> u8 {
        match self {
            Message::LightCommand { .. } => KIND_LIGHT_COMMAND,
            Message::LightAck { .. } => KIND_LIGHT_ACK,
            Message::Heartbeat { .. } => KIND_HEARTBEAT,
            Message::StateReport { .. } => KIND_STATE_REPORT,
            Message::PairRequest { .. } => KIND_PAIR_REQUEST,
            Message::PairResponse { .. } => KIND_PAIR_RESPONSE,
        }
    }

    /// Sequence number from the header
    pub fn seq(&self) -> u16 {
        match *self {
            Message::LightCommand { seq, .. }
            | Message::LightAck { seq, .. }
            | Message::Heartbeat { seq, .. }
            | Message::StateReport { seq, .. }
            | Message::PairRequest { seq, .. }
            | Message::PairResponse { seq, .. } => seq,
        }
    }

    /// Exact encoded size of this message in bytes
    pub fn wire_len(&self) -> usize {
        HEADER_LEN + payload_len(self.kind()).unwrap_or(0)
    }

    /// Encode this message into a byte buffer
    ///
    /// Returns the number of bytes written, always equal to
    /// [`Message::wire_len`].
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        let len = self.wire_len();
        if buffer.len() < len {
            return Err(EncodeError::BufferTooSmall);
        }

        buffer[0] = PROTOCOL_VERSION;
        buffer[1] = self.kind();
        buffer[2..4].copy_from_slice(&self.seq().to_le_bytes());

        let payload = &mut buffer[HEADER_LEN..len];
        match *self {
            Message::LightCommand { mask, state, .. } => {
                payload[0] = mask;
                payload[1] = state;
            }
            Message::LightAck { light_state, status, .. } => {
                payload[0] = light_state;
                payload[1] = status.to_byte();
            }
            Message::Heartbeat { light_state, .. } => {
                payload[0] = light_state;
            }
            Message::StateReport { light_state, uptime_ms, .. } => {
                payload[0] = light_state;
                payload[1..5].copy_from_slice(&uptime_ms.to_le_bytes());
            }
            Message::PairRequest { sender_id, .. } => {
                payload.copy_from_slice(sender_id.as_bytes());
            }
            Message::PairResponse { responder_id, .. } => {
                payload.copy_from_slice(responder_id.as_bytes());
            }
        }

        Ok(len)
    }

    /// Encode this message into a heapless Vec
    pub fn encode_to_vec(&self) -> Vec<u8, MAX_MESSAGE_LEN> {
        let mut buffer = [0u8; MAX_MESSAGE_LEN];
        // MAX_MESSAGE_LEN covers every kind, so this cannot fail
        let len = self.encode(&mut buffer).unwrap_or(0);
        let mut vec = Vec::new();
        let _ = vec.extend_from_slice(&buffer[..len]);
        vec
    }

    /// Decode a message from a received buffer
    ///
    /// Returns `Ok(None)` for an unknown message kind or an unknown ack
    /// status byte: both are silently ignored for forward compatibility.
    /// Trailing bytes beyond the kind's wire size are tolerated.
    pub fn decode(bytes: &[u8]) -> Result<Option<Message>, DecodeError> {
        if bytes.len() < HEADER_LEN {
            return Err(DecodeError::TooShort);
        }

        let version = bytes[0];
        let kind = bytes[1];
        let seq = u16::from_le_bytes([bytes[2], bytes[3]]);

        if version != PROTOCOL_VERSION {
            return Err(DecodeError::VersionMismatch { version, kind, seq });
        }

        let Some(expected) = payload_len(kind) else {
            return Ok(None);
        };

        let payload = &bytes[HEADER_LEN..];
        if payload.len() < expected {
            return Err(DecodeError::Truncated { kind, seq });
        }

        let message = match kind {
            KIND_LIGHT_COMMAND => Message::LightCommand {
                seq,
                mask: payload[0],
                state: payload[1],
            },
            KIND_LIGHT_ACK => {
                let Some(status) = AckStatus::from_byte(payload[1]) else {
                    return Ok(None);
                };
                Message::LightAck {
                    seq,
                    light_state: payload[0],
                    status,
                }
            }
            KIND_HEARTBEAT => Message::Heartbeat {
                seq,
                light_state: payload[0],
            },
            KIND_STATE_REPORT => Message::StateReport {
                seq,
                light_state: payload[0],
                uptime_ms: u32::from_le_bytes([payload[1], payload[2], payload[3], payload[4]]),
            },
            KIND_PAIR_REQUEST => Message::PairRequest {
                seq,
                sender_id: PeerAddr::from_slice(payload).ok_or(DecodeError::Truncated { kind, seq })?,
            },
            KIND_PAIR_RESPONSE => Message::PairResponse {
                seq,
                responder_id: PeerAddr::from_slice(payload).ok_or(DecodeError::Truncated { kind, seq })?,
            },
            // payload_len already filtered unknown kinds
            _ => return Ok(None),
        };

        Ok(Some(message))
    }
}

/// Payload size for a message kind, or None for unknown kinds
fn payload_len(kind: u8) -> Option<usize> {
    match kind {
        KIND_LIGHT_COMMAND | KIND_LIGHT_ACK => Some(2),
        KIND_HEARTBEAT => Some(1),
        KIND_STATE_REPORT => Some(5),
        KIND_PAIR_REQUEST | KIND_PAIR_RESPONSE => Some(PeerAddr::LEN),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_light_command_layout() {
        let msg = Message::LightCommand {
            seq: 0x1234,
            mask: 0b00100,
            state: 0b00100,
        };
        let bytes = msg.encode_to_vec();
        assert_eq!(
            bytes.as_slice(),
            &[PROTOCOL_VERSION, KIND_LIGHT_COMMAND, 0x34, 0x12, 0b00100, 0b00100]
        );
    }

    #[test]
    fn test_state_report_layout() {
        let msg = Message::StateReport {
            seq: 7,
            light_state: 0x1F,
            uptime_ms: 0x0102_0304,
        };
        let bytes = msg.encode_to_vec();
        assert_eq!(bytes.len(), 9);
        assert_eq!(&bytes[4..], &[0x1F, 0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_wire_sizes() {
        let id = PeerAddr::new([1, 2, 3, 4, 5, 6]);
        let cases = [
            (Message::LightCommand { seq: 1, mask: 0, state: 0 }, 6),
            (Message::LightAck { seq: 1, light_state: 0, status: AckStatus::Ok }, 6),
            (Message::Heartbeat { seq: 1, light_state: 0 }, 5),
            (Message::StateReport { seq: 1, light_state: 0, uptime_ms: 0 }, 9),
            (Message::PairRequest { seq: 1, sender_id: id }, 10),
            (Message::PairResponse { seq: 1, responder_id: id }, 10),
        ];
        for (msg, size) in cases {
            assert_eq!(msg.wire_len(), size);
            assert_eq!(msg.encode_to_vec().len(), size);
        }
    }

    #[test]
    fn test_roundtrip_all_kinds() {
        let id = PeerAddr::new([0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01]);
        let messages = [
            Message::LightCommand { seq: 65535, mask: 0x1F, state: 0x15 },
            Message::LightAck { seq: 0, light_state: 0x15, status: AckStatus::InvalidPayload },
            Message::Heartbeat { seq: 42, light_state: 0 },
            Message::StateReport { seq: 42, light_state: 3, uptime_ms: 86_400_000 },
            Message::PairRequest { seq: 1, sender_id: id },
            Message::PairResponse { seq: 1, responder_id: id },
        ];
        for msg in messages {
            let bytes = msg.encode_to_vec();
            let decoded = Message::decode(&bytes).unwrap().unwrap();
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn test_too_short_header() {
        assert_eq!(Message::decode(&[]), Err(DecodeError::TooShort));
        assert_eq!(
            Message::decode(&[PROTOCOL_VERSION, KIND_HEARTBEAT, 0]),
            Err(DecodeError::TooShort)
        );
    }

    #[test]
    fn test_truncated_payload_keeps_header() {
        // LightCommand header present, payload missing one byte
        let bytes = [PROTOCOL_VERSION, KIND_LIGHT_COMMAND, 0x05, 0x00, 0x1F];
        assert_eq!(
            Message::decode(&bytes),
            Err(DecodeError::Truncated { kind: KIND_LIGHT_COMMAND, seq: 5 })
        );
    }

    #[test]
    fn test_version_mismatch_keeps_header() {
        let msg = Message::LightCommand { seq: 9, mask: 1, state: 1 };
        let mut bytes = msg.encode_to_vec();
        bytes[0] = PROTOCOL_VERSION + 1;
        assert_eq!(
            Message::decode(&bytes),
            Err(DecodeError::VersionMismatch {
                version: PROTOCOL_VERSION + 1,
                kind: KIND_LIGHT_COMMAND,
                seq: 9,
            })
        );
    }

    #[test]
    fn test_unknown_kind_ignored() {
        let bytes = [PROTOCOL_VERSION, 0x7E, 0x00, 0x00, 0xAA, 0xBB];
        assert_eq!(Message::decode(&bytes), Ok(None));
    }

    #[test]
    fn test_unknown_ack_status_ignored() {
        let bytes = [PROTOCOL_VERSION, KIND_LIGHT_ACK, 0x00, 0x00, 0x1F, 0x7F];
        assert_eq!(Message::decode(&bytes), Ok(None));
    }

    #[test]
    fn test_trailing_bytes_tolerated() {
        let msg = Message::Heartbeat { seq: 3, light_state: 0x10 };
        let mut padded = [0u8; 12];
        let len = msg.encode(&mut padded).unwrap();
        assert_eq!(len, 5);
        let decoded = Message::decode(&padded).unwrap().unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let msg = Message::PairRequest {
            seq: 1,
            sender_id: PeerAddr::new([1, 2, 3, 4, 5, 6]),
        };
        let mut buffer = [0u8; 9];
        assert_eq!(msg.encode(&mut buffer), Err(EncodeError::BufferTooSmall));
    }

    #[test]
    fn test_ack_status_roundtrip() {
        for status in [AckStatus::Ok, AckStatus::InvalidPayload, AckStatus::VersionMismatch] {
            assert_eq!(AckStatus::from_byte(status.to_byte()), Some(status));
        }
        assert_eq!(AckStatus::from_byte(0x03), None);
    }

    proptest! {
        #[test]
        fn prop_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..24)) {
            let _ = Message::decode(&bytes);
        }

        #[test]
        fn prop_header_survives_roundtrip(seq: u16, mask: u8, state: u8) {
            let msg = Message::LightCommand { seq, mask, state };
            let bytes = msg.encode_to_vec();
            let decoded = Message::decode(&bytes).unwrap().unwrap();
            prop_assert_eq!(decoded.seq(), seq);
            prop_assert_eq!(decoded.kind(), KIND_LIGHT_COMMAND);
        }
    }
}
