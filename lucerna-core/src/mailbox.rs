//! Inbound frame mailbox
//!
//! The radio driver delivers received frames from its own context (thread
//! or interrupt), while session state is owned by the foreground loop.
//! Mutating a session from both contexts is a data race, so the receive
//! callback only copies the raw frame plus sender address into this bounded
//! single-producer single-consumer queue; the foreground loop drains it and
//! feeds `handle_frame`.
//!
//! Nothing here blocks. When the queue is full the frame is dropped, which
//! the protocol already survives: a dropped frame is indistinguishable from
//! radio loss.

use heapless::spsc::{Consumer, Producer, Queue};
use lucerna_protocol::{PeerAddr, MAX_MESSAGE_LEN};

/// Queue depth; usable capacity is one less (heapless spsc invariant)
pub const MAILBOX_DEPTH: usize = 8;

/// A raw received frame with its sender address
#[derive(Debug, Clone)]
pub struct InboundFrame {
    sender: PeerAddr,
    len: u8,
    buf: [u8; MAX_MESSAGE_LEN],
}

impl InboundFrame {
    /// Copy a received frame
    ///
    /// Returns None for frames larger than any protocol message; those
    /// cannot be ours and are dropped at the door.
    pub fn new(sender: PeerAddr, bytes: &[u8]) -> Option<Self> {
        if bytes.len() > MAX_MESSAGE_LEN {
            return None;
        }
        let mut buf = [0u8; MAX_MESSAGE_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(Self {
            sender,
            len: bytes.len() as u8,
            buf,
        })
    }

    /// Address the frame arrived from
    pub fn sender(&self) -> PeerAddr {
        self.sender
    }

    /// The received bytes
    pub fn bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }
}

/// The mailbox queue; split it once at startup into producer and consumer
pub type Mailbox = Queue<InboundFrame, MAILBOX_DEPTH>;

/// Producer half, owned by the radio receive context
pub type FrameProducer<'a> = Producer<'a, InboundFrame, MAILBOX_DEPTH>;

/// Consumer half, owned by the foreground loop
pub type FrameConsumer<'a> = Consumer<'a, InboundFrame, MAILBOX_DEPTH>;

/// Enqueue a received frame, dropping it if oversized or the queue is full
///
/// Returns true if the frame was queued. Safe to call from the radio
/// receive context.
pub fn push_frame(producer: &mut FrameProducer<'_>, sender: PeerAddr, bytes: &[u8]) -> bool {
    let Some(frame) = InboundFrame::new(sender, bytes) else {
        return false;
    };
    producer.enqueue(frame).is_ok()
}
