//! Receiver session (RX engine)
//!
//! Owns the light-node side of the protocol: per-peer command
//! authorization, ack emission, heartbeat keep-alives, the failsafe
//! watchdog, and the pairing-responder half of the handshake.
//!
//! Driven the same way as the controller session: `handle_frame` from the
//! mailbox, `tick` and `check_failsafe` from the foreground loop.

use lucerna_protocol::message::KIND_LIGHT_COMMAND;
use lucerna_protocol::{AckStatus, DecodeError, Message, PeerAddr};

use crate::config::LinkTimings;
use crate::traits::{LightSink, PeerRecord, PeerStore, StoreError, Transport};

/// Receiver pairing status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairingState {
    /// No controller bound and none stored
    Unpaired,
    /// Accepting pairing requests (boot-time operator gesture)
    PairingMode,
    /// Bound to one controller
    Paired,
}

/// Receiver-side protocol session
pub struct ReceiverSession<T, P, L>
where
    T: Transport,
    P: PeerStore,
    L: LightSink,
{
    transport: T,
    store: P,
    lights: L,
    own_addr: PeerAddr,
    timings: LinkTimings,
    peer: Option<PeerAddr>,
    pairing_mode: bool,
    seq: u16,
    last_command_ms: u32,
    last_heartbeat_ms: u32,
    /// Set once the failsafe has fired; cleared by the next accepted
    /// command so it triggers once per silence period
    failsafe_armed: bool,
}

impl<T, P, L> ReceiverSession<T, P, L>
where
    T: Transport,
    P: PeerStore,
    L: LightSink,
{
    /// Create a new session
    ///
    /// The failsafe clock starts at `now_ms`: a receiver that never hears a
    /// command still blanks its outputs after the silence window.
    pub fn new(transport: T, store: P, lights: L, own_addr: PeerAddr, timings: LinkTimings, now_ms: u32) -> Self {
        Self {
            transport,
            store,
            lights,
            own_addr,
            timings,
            peer: None,
            pairing_mode: false,
            seq: 0,
            last_command_ms: now_ms,
            last_heartbeat_ms: now_ms,
            failsafe_armed: false,
        }
    }

    /// Rebind the controller persisted by a previous pairing
    pub fn restore(&mut self) -> Result<bool, StoreError> {
        match self.store.load()? {
            Some(record) if record.paired => {
                let _ = self.transport.register_peer(record.addr);
                self.peer = Some(record.addr);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Open the pairing window
    ///
    /// Allowed while already paired: the next pairing request re-binds to a
    /// new controller, overwriting the stored record.
    pub fn enter_pairing_mode(&mut self) {
        self.pairing_mode = true;
    }

    /// Process a raw received frame
    ///
    /// A readable-but-broken `LightCommand` from an authorized sender is
    /// answered with the matching non-Ok ack status; everything else
    /// malformed is dropped silently.
    pub fn handle_frame(&mut self, frame: &[u8], sender: PeerAddr, now_ms: u32) {
        match Message::decode(frame) {
            Ok(Some(message)) => self.on_message(message, sender, now_ms),
            Err(DecodeError::Truncated { kind, seq }) if kind == KIND_LIGHT_COMMAND => {
                self.nack(sender, seq, AckStatus::InvalidPayload);
            }
            Err(DecodeError::VersionMismatch { kind, seq, .. }) if kind == KIND_LIGHT_COMMAND => {
                self.nack(sender, seq, AckStatus::VersionMismatch);
            }
            // Unknown kinds and unreadable frames: no response, no state
            // change
            Ok(None) | Err(_) => {}
        }
    }

    /// Process a decoded message
    pub fn on_message(&mut self, message: Message, sender: PeerAddr, now_ms: u32) {
        match message {
            Message::LightCommand { seq, mask, state } => {
                // Once paired only the bound controller is honored; before
                // pairing anyone may drive the lights (permissive bootstrap)
                if !self.authorized(sender) {
                    return;
                }

                self.lights.apply(mask, state);
                self.last_command_ms = now_ms;
                self.failsafe_armed = false;

                // The ack echoes the command's sequence and reports the
                // full post-apply state
                let ack = Message::LightAck {
                    seq,
                    light_state: self.lights.get_state(),
                    status: AckStatus::Ok,
                };
                let _ = self.transport.send_unicast(sender, &ack.encode_to_vec());
            }
            Message::PairRequest { seq, .. } => {
                if !self.pairing_mode {
                    return;
                }

                self.bind_peer(sender);
                self.pairing_mode = false;

                let response = Message::PairResponse {
                    seq,
                    responder_id: self.own_addr,
                };
                let _ = self.transport.send_unicast(sender, &response.encode_to_vec());

                // Also push a full report so the new controller starts
                // from actual truth instead of waiting for a heartbeat
                let report_seq = self.next_seq();
                let report = Message::StateReport {
                    seq: report_seq,
                    light_state: self.lights.get_state(),
                    uptime_ms: now_ms,
                };
                let _ = self.transport.send_unicast(sender, &report.encode_to_vec());
            }
            // Acks, heartbeats, and reports are controller-bound
            _ => {}
        }
    }

    /// Emit heartbeats on the configured cadence while paired
    pub fn tick(&mut self, now_ms: u32) {
        let Some(peer) = self.peer else { return };

        if now_ms.wrapping_sub(self.last_heartbeat_ms) >= self.timings.heartbeat_interval_ms {
            self.last_heartbeat_ms = now_ms;
            let seq = self.next_seq();
            let beat = Message::Heartbeat {
                seq,
                light_state: self.lights.get_state(),
            };
            let _ = self.transport.send_unicast(peer, &beat.encode_to_vec());
        }
    }

    /// Failsafe watchdog: blank the outputs after prolonged command silence
    ///
    /// Edge-triggered: fires at most once per silence period, independent
    /// of pairing state. Re-arms only when a new accepted command arrives.
    pub fn check_failsafe(&mut self, now_ms: u32) {
        if !self.failsafe_armed
            && now_ms.wrapping_sub(self.last_command_ms) >= self.timings.failsafe_timeout_ms
            && self.lights.get_state() != 0
        {
            self.lights.all_off();
            self.failsafe_armed = true;
        }
    }

    /// Current pairing status
    pub fn pairing_state(&self) -> PairingState {
        if self.pairing_mode {
            PairingState::PairingMode
        } else if self.peer.is_some() {
            PairingState::Paired
        } else {
            PairingState::Unpaired
        }
    }

    /// Check if a controller is bound
    pub fn is_paired(&self) -> bool {
        self.peer.is_some()
    }

    /// The bound controller, if any
    pub fn paired_peer(&self) -> Option<PeerAddr> {
        self.peer
    }

    /// Check whether the failsafe has fired for the current silence period
    pub fn failsafe_fired(&self) -> bool {
        self.failsafe_armed
    }

    /// This node's own radio address
    pub fn own_addr(&self) -> PeerAddr {
        self.own_addr
    }

    fn authorized(&self, sender: PeerAddr) -> bool {
        self.peer.map_or(true, |peer| peer == sender)
    }

    fn nack(&mut self, dest: PeerAddr, seq: u16, status: AckStatus) {
        // Same security boundary as commands: strangers get silence
        if !self.authorized(dest) {
            return;
        }
        let ack = Message::LightAck {
            seq,
            light_state: self.lights.get_state(),
            status,
        };
        let _ = self.transport.send_unicast(dest, &ack.encode_to_vec());
    }

    fn next_seq(&mut self) -> u16 {
        self.seq = self.seq.wrapping_add(1);
        self.seq
    }

    fn bind_peer(&mut self, addr: PeerAddr) {
        let _ = self.transport.register_peer(addr);
        self.peer = Some(addr);
        // Non-fatal on failure; the binding still works until reboot
        let _ = self.store.save(&PeerRecord::paired_with(addr));
    }
}
