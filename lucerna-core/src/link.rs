//! Controller-side link state machine
//!
//! Pairing status and connection liveness for the controller session are a
//! function of the current state and an event. `Paired*` states only return
//! to `Pairing` on an explicit user-initiated re-pair.

/// Link states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// No peer bound and none stored
    Unpaired,
    /// Pairing request broadcast, waiting for a response
    Pairing,
    /// Peer bound but nothing heard within the liveness window
    PairedDisconnected,
    /// Peer bound and recently heard from
    PairedConnected,
}

/// Events that can change the link state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// User started (re-)pairing; a request was broadcast
    PairingStarted,
    /// A peer was bound: pairing response received, or a stored record
    /// restored at boot
    PeerBound,
    /// Any ack/heartbeat/report arrived from the bound peer
    PeerAlive,
    /// Liveness window elapsed without hearing from the peer
    LivenessLost,
}

impl LinkState {
    /// Check if a peer is bound in this state
    pub fn is_paired(&self) -> bool {
        matches!(self, LinkState::PairedDisconnected | LinkState::PairedConnected)
    }

    /// Check if the peer is considered live
    pub fn is_connected(&self) -> bool {
        matches!(self, LinkState::PairedConnected)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: LinkEvent) -> Self {
        use LinkEvent::*;
        use LinkState::*;

        match (self, event) {
            // Re-pairing is allowed from every state, including while paired
            (_, PairingStarted) => Pairing,

            // Binding a peer starts disconnected; the first heartbeat or
            // ack flips the connection up
            (Unpaired, PeerBound) => PairedDisconnected,
            (Pairing, PeerBound) => PairedDisconnected,

            (PairedDisconnected, PeerAlive) => PairedConnected,
            (PairedConnected, PeerAlive) => PairedConnected,

            (PairedConnected, LivenessLost) => PairedDisconnected,

            // Default: stay in current state
            _ => self,
        }
    }
}
