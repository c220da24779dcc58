//! Protocol timing configuration
//!
//! The reference values are fixed properties of the link, not user-facing
//! settings, but they live in a struct so tests can shorten them and so a
//! host can persist alternates alongside the peer record.

use serde::{Deserialize, Serialize};

/// Default: resend an unacknowledged command after this long
pub const ACK_TIMEOUT_MS: u32 = 200;
/// Default: resend at most this many times before giving up
pub const ACK_MAX_RETRIES: u8 = 3;
/// Default: receiver heartbeat period while paired
pub const HEARTBEAT_INTERVAL_MS: u32 = 2000;
/// Default: controller flips to disconnected after this long without
/// hearing from the receiver
pub const HEARTBEAT_TIMEOUT_MS: u32 = 6000;
/// Default: receiver forces all lights off after this long without an
/// accepted command
pub const FAILSAFE_TIMEOUT_MS: u32 = 30_000;

/// Timing parameters for both session engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkTimings {
    /// Command retry timeout (ms)
    pub ack_timeout_ms: u32,
    /// Maximum command resends before reverting optimistic state
    pub ack_max_retries: u8,
    /// Heartbeat emission period (ms)
    pub heartbeat_interval_ms: u32,
    /// Liveness timeout (ms); must exceed the heartbeat interval
    pub heartbeat_timeout_ms: u32,
    /// Failsafe silence window (ms)
    pub failsafe_timeout_ms: u32,
}

impl Default for LinkTimings {
    fn default() -> Self {
        Self {
            ack_timeout_ms: ACK_TIMEOUT_MS,
            ack_max_retries: ACK_MAX_RETRIES,
            heartbeat_interval_ms: HEARTBEAT_INTERVAL_MS,
            heartbeat_timeout_ms: HEARTBEAT_TIMEOUT_MS,
            failsafe_timeout_ms: FAILSAFE_TIMEOUT_MS,
        }
    }
}
