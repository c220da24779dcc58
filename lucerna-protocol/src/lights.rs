//! Light channel bit assignments
//!
//! All light state travels as an 8-bit bitmask. Bit positions are part of
//! the protocol contract between controller and receiver and are never
//! renegotiated.

/// Fog lights
pub const LIGHT_FOG: u8 = 1 << 0;
/// Low beam headlights
pub const LIGHT_LOW_BEAM: u8 = 1 << 1;
/// High beam headlights
pub const LIGHT_HIGH_BEAM: u8 = 1 << 2;
/// Roof light bar
pub const LIGHT_BAR: u8 = 1 << 3;
/// Hazard flashers
pub const LIGHT_HAZARD: u8 = 1 << 4;

/// All assigned light bits
pub const LIGHT_ALL: u8 = LIGHT_FOG | LIGHT_LOW_BEAM | LIGHT_HIGH_BEAM | LIGHT_BAR | LIGHT_HAZARD;

/// Apply a masked update to a light bitmask
///
/// Bits selected by `mask` take their value from `state`; all other bits
/// keep their prior value. This is the single authoritative definition of
/// how a `LightCommand{mask, state}` modifies output state.
pub const fn apply_masked(prior: u8, mask: u8, state: u8) -> u8 {
    (prior & !mask) | (state & mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_masked_sequence() {
        // Turn fog + low beam region on one bit at a time
        let s = apply_masked(0b00000, 0b00011, 0b00001);
        assert_eq!(s, 0b00001);
        let s = apply_masked(s, 0b00100, 0b00100);
        assert_eq!(s, 0b00101);
        // Clearing a masked bit leaves the rest alone
        let s = apply_masked(s, 0b00001, 0b00000);
        assert_eq!(s, 0b00100);
    }

    #[test]
    fn test_unmasked_bits_untouched() {
        assert_eq!(apply_masked(LIGHT_ALL, LIGHT_HAZARD, 0), LIGHT_ALL & !LIGHT_HAZARD);
        assert_eq!(apply_masked(0, 0, 0xFF), 0);
    }

    proptest! {
        #[test]
        fn prop_apply_masked(prior: u8, mask: u8, state: u8) {
            let out = apply_masked(prior, mask, state);
            // Masked bits come from state, unmasked bits from prior
            prop_assert_eq!(out & mask, state & mask);
            prop_assert_eq!(out & !mask, prior & !mask);
        }

        #[test]
        fn prop_apply_masked_idempotent(prior: u8, mask: u8, state: u8) {
            let once = apply_masked(prior, mask, state);
            prop_assert_eq!(apply_masked(once, mask, state), once);
        }
    }
}
