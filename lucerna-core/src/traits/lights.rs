//! Light output driver trait

/// Light output driver consumed by the receiver session
///
/// State is an 8-bit bitmask using the assignments in
/// [`lucerna_protocol::lights`]. How a set bit maps to actual output
/// (GPIO level, PWM brightness) is the driver's business.
pub trait LightSink {
    /// Apply `state` to the bits selected by `mask`; other bits keep
    /// their current value
    fn apply(&mut self, mask: u8, state: u8);

    /// Current output state as a bitmask
    fn get_state(&self) -> u8;

    /// Force every output off (failsafe path)
    fn all_off(&mut self);
}
