//! Lucerna light link wire protocol
//!
//! This crate defines the binary messages exchanged between the handheld
//! controller (TX) and the light receiver (RX) over a connectionless,
//! best-effort radio link. Delivery is unordered, possibly duplicated, and
//! possibly lost; reliability lives in the session engines, not here.
//!
//! # Wire format
//!
//! All messages are packed little-endian with a common 4-byte header:
//! ```text
//! ┌─────────┬──────┬─────────┬──────────────────┐
//! │ VERSION │ KIND │ SEQ     │ PAYLOAD          │
//! │ 1B      │ 1B   │ 2B (LE) │ kind-specific    │
//! └─────────┴──────┴─────────┴──────────────────┘
//! ```
//!
//! Sequence numbers are per-sender and wrap at 65536. They identify a
//! message for retry/ack correlation only; receivers must not assume
//! in-order delivery.

#![no_std]
#![deny(unsafe_code)]

pub mod lights;
pub mod message;
pub mod peer;

pub use lights::{apply_masked, LIGHT_ALL, LIGHT_BAR, LIGHT_FOG, LIGHT_HAZARD, LIGHT_HIGH_BEAM, LIGHT_LOW_BEAM};
pub use message::{AckStatus, DecodeError, EncodeError, Message, HEADER_LEN, MAX_MESSAGE_LEN, PROTOCOL_VERSION};
pub use peer::{PeerAddr, BROADCAST};
