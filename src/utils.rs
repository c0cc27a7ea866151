/// Full scale of a 14-bit AS5047P angle frame
pub const ANGLE_MAX: u16 = 0x3FFF + 1;

/// Mask selecting the 14 data bits of a response frame
pub const DATA_MASK: u16 = 0x3FFF;

/// Calculate even parity bit for the lower 15 bits of a 16-bit value
pub fn calculate_parity(value: u16) -> bool {
    let bits = value & 0x7FFF;
    bits.count_ones() % 2 == 1
}

/// Verify even parity of a 16-bit frame
pub fn verify_parity(frame: u16) -> bool {
    frame.count_ones().is_multiple_of(2)
}

/// Set the parity bit of a command frame so the whole frame has even parity
pub fn with_parity(command: u16) -> u16 {
    if calculate_parity(command) {
        0x8000 | command
    } else {
        command
    }
}

/// Convert a raw 14-bit angle to degrees in `[0, 360)`
pub fn angle_to_degrees(raw: u16) -> f32 {
    f32::from(raw & DATA_MASK) * 360.0 / f32::from(ANGLE_MAX)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn parity_bit_makes_frame_even() {
        for command in [0x4000 | 0x3FFF, 0x4000 | 0x3FFC, 0x0001, 0x0000] {
            assert!(verify_parity(with_parity(command)));
        }
    }

    #[test]
    fn odd_frame_fails_verification() {
        assert!(!verify_parity(0xC001));
    }

    #[test]
    fn quarter_turn_is_ninety_degrees() {
        assert_eq!(angle_to_degrees(0x1000), 90.0);
        assert_eq!(angle_to_degrees(0x0000), 0.0);
    }

    #[test]
    fn conversion_ignores_status_bits() {
        assert_eq!(angle_to_degrees(0xC000 | 0x2000), 180.0);
    }
}
