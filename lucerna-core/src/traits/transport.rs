//! Radio transport trait

use lucerna_protocol::PeerAddr;

/// Errors from transport operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The radio rejected or failed the send
    Send,
    /// The peer table is full or the address could not be registered
    PeerTable,
}

/// Connectionless best-effort radio transport (ESP-NOW class)
///
/// Delivery is unordered, possibly duplicated, possibly lost; none of the
/// send operations wait for the peer. Implementations deliver received
/// frames from their own context (driver thread or interrupt); hosts must
/// hand those to the foreground loop via the mailbox rather than calling
/// into a session directly.
pub trait Transport {
    /// Send a frame to a single registered peer
    fn send_unicast(&mut self, dest: PeerAddr, frame: &[u8]) -> Result<(), TransportError>;

    /// Send a frame to the all-peers broadcast address
    fn send_broadcast(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Register an address so unicast sends to it are accepted
    ///
    /// Registering an already-known address is a no-op.
    fn register_peer(&mut self, addr: PeerAddr) -> Result<(), TransportError>;
}
