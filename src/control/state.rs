// SPDX-License-Identifier: MIT

//! Shared control state for the treadmill.
//!
//! One instance of [`ControlState`] is the single source of truth read and
//! written by the keypad, capture, and report interrupt handlers. The
//! firmware keeps it inside a critical-section `Mutex`; everything in this
//! module takes `&mut` and is oblivious to preemption.

/// Highest commandable belt speed, in km/h.
pub const MAX_SPEED_KMH: u8 = 15;

/// Pending speed entry: at most two decimal digits, most significant first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigitBuffer {
    digits: [u8; 2],
    len: u8,
}

/// Attempt to store a third digit while two are already pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitBufferFull;

impl DigitBuffer {
    /// Empty buffer.
    pub const fn new() -> Self {
        Self {
            digits: [0; 2],
            len: 0,
        }
    }

    /// Append a digit (0..=9). Fails once two digits are pending.
    pub fn push(&mut self, digit: u8) -> Result<(), DigitBufferFull> {
        if self.len >= 2 {
            return Err(DigitBufferFull);
        }
        self.digits[self.len as usize] = digit;
        self.len += 1;
        Ok(())
    }

    /// Number of pending digits.
    #[inline]
    pub fn len(&self) -> u8 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entered value as `d0 * 10 + d1`, with missing entries read as 0.
    ///
    /// A single entered digit therefore commands a multiple of 10: entering
    /// "1" and confirming asks for 10 km/h, consistent with the panel's
    /// fixed two-place entry model.
    pub fn value(&self) -> u8 {
        let d0 = if self.len >= 1 { self.digits[0] } else { 0 };
        let d1 = if self.len >= 2 { self.digits[1] } else { 0 };
        d0 * 10 + d1
    }

    /// Discard all pending digits.
    pub fn clear(&mut self) {
        self.digits = [0; 2];
        self.len = 0;
    }
}

/// The controller's shared mutable state.
///
/// Field discipline: [`handle_key`](crate::control::interpreter::handle_key)
/// is the only writer of `powered`, `speed_kmh`, `digits`, and `tracking`;
/// the capture handler is the only writer of `rate_ppm`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    /// Belt power flag; all keys except power-on are inert while false.
    pub powered: bool,
    /// Current speed setpoint, 0..=[`MAX_SPEED_KMH`].
    pub speed_kmh: u8,
    /// Digits entered toward the next setpoint.
    pub digits: DigitBuffer,
    /// Heart-rate tracking (capture + telemetry) enabled.
    pub tracking: bool,
    /// Latest smoothed heart-rate estimate, pulses per minute.
    pub rate_ppm: u16,
}

impl ControlState {
    /// Power-up state: everything off, zeroed.
    pub const fn new() -> Self {
        Self {
            powered: false,
            speed_kmh: 0,
            digits: DigitBuffer::new(),
            tracking: false,
            rate_ppm: 0,
        }
    }
}
