//! Board-agnostic core logic for the Lucerna light link
//!
//! This crate contains the two protocol session engines and everything they
//! need that does not depend on a specific board or radio:
//!
//! - Hardware abstraction traits (radio transport, light sink, peer store,
//!   status sink)
//! - Controller session: command retry, optimistic state, liveness tracking,
//!   pairing initiator
//! - Receiver session: command authorization, heartbeat emission, failsafe
//!   watchdog, pairing responder
//! - Bounded mailbox handing inbound frames from the radio receive context
//!   to the foreground loop
//! - Timing configuration
//!
//! Sessions are plain structs driven by the firmware host: the radio receive
//! callback pushes raw frames into the [`mailbox`], and a single foreground
//! loop drains it into `handle_frame` and calls `tick` on a short fixed
//! period. All session state is therefore mutated from one context only.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod link;
pub mod mailbox;
pub mod receiver;
pub mod traits;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::LinkTimings;
pub use controller::{ControllerSession, PendingCommand};
pub use link::LinkState;
pub use mailbox::{InboundFrame, Mailbox};
pub use receiver::{PairingState, ReceiverSession};
