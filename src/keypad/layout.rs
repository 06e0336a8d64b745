// SPDX-License-Identifier: MIT

//! Fixed layout tables for the 4x4 matrix keypad.
//!
//! The keypad uses a non-standard labeling: the fourth column carries the
//! function keys `A`/`B`/`C`/`D` top to bottom, and the bottom row reads
//! `E 0 F D`. A pressed key is identified by its table index
//! `4 * row + column`, which selects into two parallel tables: the
//! seven-segment code echoed on the feedback display, and the decimal value
//! used for speed entry.

/// Number of keypad rows.
pub const ROWS: u8 = 4;

/// Number of keypad columns.
pub const COLUMNS: u8 = 4;

/// Total number of keys (`ROWS * COLUMNS`).
pub const KEY_COUNT: usize = (ROWS * COLUMNS) as usize;

/// Seven-segment display codes, indexed by `4 * row + column`.
pub const KEY_SEGMENTS: [u8; KEY_COUNT] = [
    0x06, 0x5b, 0x4f, 0x77, // 1 2 3 A
    0x66, 0x6d, 0x7d, 0x7c, // 4 5 6 B
    0x07, 0x7f, 0x67, 0x39, // 7 8 9 C
    0x79, 0x3f, 0x71, 0x5e, // E 0 F D
];

/// Decimal digit values, indexed by `4 * row + column`.
///
/// Function keys read as 0 here; their identity comes from [`decode`].
pub const KEY_DIGITS: [u8; KEY_COUNT] = [
    1, 2, 3, 0, // 1 2 3 _
    4, 5, 6, 0, // 4 5 6 _
    7, 8, 9, 0, // 7 8 9 _
    0, 0, 0, 0, // _ 0 _ _
];

// Table indices of the function keys.
const IDX_POWER: u8 = 3; // 'A'
const IDX_SET_SPEED: u8 = 7; // 'B'
const IDX_STOP: u8 = 11; // 'C'
const IDX_SPEED_UP: u8 = 12; // 'E'
const IDX_SPEED_DOWN: u8 = 14; // 'F'
const IDX_TRACK: u8 = 15; // 'D'

/// Semantic identity of a pressed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A decimal digit 0..=9, appended to the pending speed entry.
    Digit(u8),
    /// 'A' — power the belt on.
    Power,
    /// 'B' — commit the pending digits as the speed setpoint.
    SetSpeed,
    /// 'C' — stop: power off and reset.
    Stop,
    /// 'D' — start heart-rate tracking and telemetry.
    Track,
    /// 'E' — bump the setpoint up by 1 km/h.
    SpeedUp,
    /// 'F' — bump the setpoint down by 1 km/h.
    SpeedDown,
}

/// Decode a table index (`4 * row + column`, 0..16) to its semantic key.
pub fn decode(index: u8) -> Key {
    match index {
        IDX_POWER => Key::Power,
        IDX_SET_SPEED => Key::SetSpeed,
        IDX_STOP => Key::Stop,
        IDX_TRACK => Key::Track,
        IDX_SPEED_UP => Key::SpeedUp,
        IDX_SPEED_DOWN => Key::SpeedDown,
        _ => Key::Digit(KEY_DIGITS[(index as usize) % KEY_COUNT]),
    }
}

/// Seven-segment code for a table index, for the feedback display.
#[inline]
pub fn segments(index: u8) -> u8 {
    KEY_SEGMENTS[(index as usize) % KEY_COUNT]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_table_matches_layout() {
        // Row-major: 1 2 3 A / 4 5 6 B / 7 8 9 C / E 0 F D
        let expected: [u8; KEY_COUNT] = [
            0x06, 0x5b, 0x4f, 0x77, 0x66, 0x6d, 0x7d, 0x7c, 0x07, 0x7f, 0x67, 0x39, 0x79, 0x3f,
            0x71, 0x5e,
        ];
        for (row, chunk) in expected.chunks(4).enumerate() {
            for (col, &code) in chunk.iter().enumerate() {
                let index = (4 * row + col) as u8;
                assert_eq!(segments(index), code, "row {} col {}", row, col);
            }
        }
    }

    #[test]
    fn digit_table_matches_layout() {
        let expected: [u8; KEY_COUNT] = [1, 2, 3, 0, 4, 5, 6, 0, 7, 8, 9, 0, 0, 0, 0, 0];
        for index in 0..KEY_COUNT as u8 {
            assert_eq!(KEY_DIGITS[index as usize], expected[index as usize]);
        }
    }

    #[test]
    fn decode_function_keys() {
        assert_eq!(decode(3), Key::Power);
        assert_eq!(decode(7), Key::SetSpeed);
        assert_eq!(decode(11), Key::Stop);
        assert_eq!(decode(15), Key::Track);
        assert_eq!(decode(12), Key::SpeedUp);
        assert_eq!(decode(14), Key::SpeedDown);
    }

    #[test]
    fn decode_digit_keys() {
        assert_eq!(decode(0), Key::Digit(1));
        assert_eq!(decode(1), Key::Digit(2));
        assert_eq!(decode(2), Key::Digit(3));
        assert_eq!(decode(4), Key::Digit(4));
        assert_eq!(decode(5), Key::Digit(5));
        assert_eq!(decode(6), Key::Digit(6));
        assert_eq!(decode(8), Key::Digit(7));
        assert_eq!(decode(9), Key::Digit(8));
        assert_eq!(decode(10), Key::Digit(9));
        assert_eq!(decode(13), Key::Digit(0));
    }
}
