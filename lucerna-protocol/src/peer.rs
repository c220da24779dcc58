//! Radio peer addresses

/// 6-byte radio address identifying a protocol endpoint
///
/// On ESP-NOW class links this is the station MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerAddr(pub [u8; 6]);

/// Reserved all-ones address: pairing requests are sent here so every
/// listening receiver sees them.
pub const BROADCAST: PeerAddr = PeerAddr([0xFF; 6]);

impl PeerAddr {
    /// Address length in bytes
    pub const LEN: usize = 6;

    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// True for the reserved broadcast address
    pub fn is_broadcast(&self) -> bool {
        *self == BROADCAST
    }

    /// Parse an address from the start of a byte slice
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; 6] = bytes.get(..Self::LEN)?.try_into().ok()?;
        Some(Self(raw))
    }
}

impl From<[u8; 6]> for PeerAddr {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}
