//! Controller session (TX engine)
//!
//! Owns the handheld side of the protocol: optimistic vs confirmed light
//! state, the single in-flight command with its retry timer, connection
//! liveness, and the pairing-initiator half of the handshake.
//!
//! The host drives the session from one context: inbound frames through
//! [`handle_frame`](ControllerSession::handle_frame) (drained from the
//! mailbox) and time through [`tick`](ControllerSession::tick) on a short
//! fixed period. No operation blocks.

use lucerna_protocol::{Message, PeerAddr, BROADCAST};

use crate::config::LinkTimings;
use crate::link::{LinkEvent, LinkState};
use crate::traits::{PeerRecord, PeerStore, StatusSink, StoreError, Transport};

/// The single in-flight command awaiting an ack
///
/// Exists only between send and resolution (matching ack or retry
/// exhaustion). A newer command silently supersedes it: last intent wins,
/// which is the right call for light toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingCommand {
    /// Sequence number the ack must echo
    pub seq: u16,
    /// Light bits the command affects
    pub mask: u8,
    /// Desired value for the masked bits
    pub state: u8,
    /// When the last (re)send happened (ms)
    pub sent_at_ms: u32,
    /// Number of resends so far; 0 means first send, no retry yet
    pub retry_count: u8,
}

/// Controller-side protocol session
pub struct ControllerSession<T, P, S>
where
    T: Transport,
    P: PeerStore,
    S: StatusSink,
{
    transport: T,
    store: P,
    status: S,
    own_addr: PeerAddr,
    timings: LinkTimings,
    link: LinkState,
    peer: Option<PeerAddr>,
    seq: u16,
    /// Locally assumed state, applied to the UI before confirmation
    desired_state: u8,
    /// Last state the receiver actually reported as true
    confirmed_state: u8,
    pending: Option<PendingCommand>,
    last_live_ms: u32,
}

impl<T, P, S> ControllerSession<T, P, S>
where
    T: Transport,
    P: PeerStore,
    S: StatusSink,
{
    /// Create a new session
    ///
    /// `own_addr` is this node's radio address, advertised in pairing
    /// requests. The session starts unpaired; call
    /// [`restore`](Self::restore) to rebind a stored peer.
    pub fn new(transport: T, store: P, status: S, own_addr: PeerAddr, timings: LinkTimings, now_ms: u32) -> Self {
        Self {
            transport,
            store,
            status,
            own_addr,
            timings,
            link: LinkState::Unpaired,
            peer: None,
            seq: 0,
            desired_state: 0,
            confirmed_state: 0,
            pending: None,
            last_live_ms: now_ms,
        }
    }

    /// Rebind the peer persisted by a previous pairing
    ///
    /// Returns whether a peer was restored. The session comes up
    /// disconnected until the first heartbeat or ack arrives.
    pub fn restore(&mut self) -> Result<bool, StoreError> {
        match self.store.load()? {
            Some(record) if record.paired => {
                let _ = self.transport.register_peer(record.addr);
                self.peer = Some(record.addr);
                self.link = self.link.transition(LinkEvent::PeerBound);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Flip one light bit optimistically and send the matching command
    pub fn toggle(&mut self, light_bit: u8, now_ms: u32) {
        self.desired_state ^= light_bit;
        self.send_command(light_bit, self.desired_state & light_bit, now_ms);
    }

    /// Send a light command for the masked bits
    ///
    /// No-op without a bound peer. Any previous pending command is
    /// superseded.
    pub fn send_command(&mut self, mask: u8, state: u8, now_ms: u32) {
        let Some(peer) = self.peer else { return };

        let seq = self.next_seq();
        self.pending = Some(PendingCommand {
            seq,
            mask,
            state,
            sent_at_ms: now_ms,
            retry_count: 0,
        });

        let command = Message::LightCommand { seq, mask, state };
        // Lost sends are indistinguishable from radio loss; the retry
        // path covers both
        let _ = self.transport.send_unicast(peer, &command.encode_to_vec());
    }

    /// Broadcast a pairing request and wait for a response
    ///
    /// Fire-and-forget: there is no timeout or retry on the request, the
    /// user retries manually if no receiver is listening.
    pub fn start_pairing(&mut self) {
        let _ = self.transport.register_peer(BROADCAST);
        let seq = self.next_seq();
        let request = Message::PairRequest {
            seq,
            sender_id: self.own_addr,
        };
        let _ = self.transport.send_broadcast(&request.encode_to_vec());
        self.link = self.link.transition(LinkEvent::PairingStarted);
    }

    /// Process a raw received frame
    ///
    /// Malformed frames are dropped silently with no state change; the
    /// controller never answers errors.
    pub fn handle_frame(&mut self, frame: &[u8], sender: PeerAddr, now_ms: u32) {
        if let Ok(Some(message)) = Message::decode(frame) {
            self.on_message(message, sender, now_ms);
        }
    }

    /// Process a decoded message
    pub fn on_message(&mut self, message: Message, sender: PeerAddr, now_ms: u32) {
        match message {
            Message::LightAck { seq, light_state, .. } => {
                // Pending resolution is gated on the echoed sequence;
                // the truth collapse below is not
                if self.pending.is_some_and(|p| p.seq == seq) {
                    self.pending = None;
                }
                self.confirmed_state = light_state;
                self.desired_state = light_state;
                self.mark_alive(now_ms);
                self.status.on_state_changed(light_state);
            }
            Message::Heartbeat { light_state, .. } => {
                // A command may be in flight: refresh confirmed truth but
                // leave the optimistic guess alone
                self.confirmed_state = light_state;
                self.mark_alive(now_ms);
                self.status.on_state_changed(light_state);
            }
            Message::StateReport { light_state, .. } => {
                self.confirmed_state = light_state;
                self.desired_state = light_state;
                self.mark_alive(now_ms);
                self.status.on_state_changed(light_state);
            }
            Message::PairResponse { .. } => {
                // Only honored while actually pairing; a stray or replayed
                // response must not rebind the controller
                if self.link == LinkState::Pairing {
                    self.bind_peer(sender);
                }
            }
            // Commands and pairing requests are receiver-bound
            _ => {}
        }
    }

    /// Drive retries and the liveness watchdog
    ///
    /// Call on a steady short cadence with a millisecond timestamp.
    pub fn tick(&mut self, now_ms: u32) {
        if let Some(pending) = self.pending.as_mut() {
            if now_ms.wrapping_sub(pending.sent_at_ms) >= self.timings.ack_timeout_ms {
                if pending.retry_count < self.timings.ack_max_retries {
                    pending.retry_count += 1;
                    pending.sent_at_ms = now_ms;
                    let command = Message::LightCommand {
                        seq: pending.seq,
                        mask: pending.mask,
                        state: pending.state,
                    };
                    if let Some(peer) = self.peer {
                        let _ = self.transport.send_unicast(peer, &command.encode_to_vec());
                    }
                } else {
                    // Give up: revert the optimistic guess and let the UI
                    // reflect the rollback
                    self.pending = None;
                    self.desired_state = self.confirmed_state;
                    self.status.on_state_changed(self.confirmed_state);
                }
            }
        }

        if self.link.is_connected()
            && now_ms.wrapping_sub(self.last_live_ms) >= self.timings.heartbeat_timeout_ms
        {
            self.link = self.link.transition(LinkEvent::LivenessLost);
            self.status.on_connection_changed(false);
        }
    }

    /// Current link state
    pub fn link_state(&self) -> LinkState {
        self.link
    }

    /// Check if a peer is bound
    pub fn is_paired(&self) -> bool {
        self.link.is_paired()
    }

    /// Check if the receiver is considered live
    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    /// Last receiver-confirmed light state
    pub fn confirmed_state(&self) -> u8 {
        self.confirmed_state
    }

    /// Optimistic light state currently shown to the user
    pub fn desired_state(&self) -> u8 {
        self.desired_state
    }

    /// The bound peer, if any
    pub fn paired_peer(&self) -> Option<PeerAddr> {
        self.peer
    }

    /// The in-flight command, if any
    pub fn pending(&self) -> Option<&PendingCommand> {
        self.pending.as_ref()
    }

    /// This node's own radio address
    pub fn own_addr(&self) -> PeerAddr {
        self.own_addr
    }

    fn next_seq(&mut self) -> u16 {
        self.seq = self.seq.wrapping_add(1);
        self.seq
    }

    fn mark_alive(&mut self, now_ms: u32) {
        self.last_live_ms = now_ms;
        let was_connected = self.link.is_connected();
        self.link = self.link.transition(LinkEvent::PeerAlive);
        if !was_connected && self.link.is_connected() {
            self.status.on_connection_changed(true);
        }
    }

    fn bind_peer(&mut self, addr: PeerAddr) {
        let _ = self.transport.register_peer(addr);
        self.peer = Some(addr);
        // A storage fault is non-fatal: the binding still works until
        // reboot, and the next pairing retries the save
        let _ = self.store.save(&PeerRecord::paired_with(addr));
        self.link = self.link.transition(LinkEvent::PeerBound);
    }
}
