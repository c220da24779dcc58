//! Durable peer pairing storage
//!
//! The pairing handshake binds one peer address per node; the binding must
//! survive reboots. Implementations sit on whatever the board offers
//! (NVS partition, wear-leveled flash sector) and store the postcard
//! serialization of [`PeerRecord`].

use lucerna_protocol::PeerAddr;
use serde::{Deserialize, Serialize};

/// Upper bound on the serialized size of a [`PeerRecord`]
pub const PEER_RECORD_MAX_LEN: usize = 16;

/// Errors from peer storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Underlying storage operation failed
    Io,
    /// Stored data did not deserialize
    Corrupted,
    /// No room left to persist the record
    Full,
}

/// Durable record of the paired peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerRecord {
    /// Address of the bound peer
    pub addr: PeerAddr,
    /// Whether the pairing handshake ever completed
    pub paired: bool,
}

impl PeerRecord {
    /// Record a completed pairing
    pub const fn paired_with(addr: PeerAddr) -> Self {
        Self { addr, paired: true }
    }

    /// Serialize into `buffer`, returning the written prefix
    pub fn to_bytes<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a [u8], StoreError> {
        postcard::to_slice(self, buffer).map_err(|_| StoreError::Full).map(|s| &*s)
    }

    /// Deserialize from stored bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        postcard::from_bytes(bytes).map_err(|_| StoreError::Corrupted)
    }
}

/// Peer record persistence
pub trait PeerStore {
    /// Load the stored record, or None if nothing was ever saved
    fn load(&mut self) -> Result<Option<PeerRecord>, StoreError>;

    /// Persist the record, replacing any previous one
    fn save(&mut self, record: &PeerRecord) -> Result<(), StoreError>;
}
