//! UI status callbacks

/// Status sink consumed by the controller session
///
/// The UI renders from these callbacks only; it never polls the session
/// mid-operation. Both are invoked from the foreground loop context.
pub trait StatusSink {
    /// Confirmed light state changed (ack, heartbeat, report, or a
    /// retry-exhaustion rollback)
    fn on_state_changed(&mut self, light_state: u8);

    /// Connection liveness flipped; fires only on edges
    fn on_connection_changed(&mut self, connected: bool);
}
