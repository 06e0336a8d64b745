// SPDX-License-Identifier: MIT

//! In-memory peripheral implementations for host tests.
//!
//! Each mock records the state a test wants to assert on (last duty, bytes
//! sent, interrupt sources enabled). [`MockKeypad`] models the matrix
//! electrically: a pressed key pulls its column low, and driving the pressed
//! row high lifts the column back to the pull-up level, which is exactly the
//! pattern the scanner's row walk looks for.

use heapless::Vec;

use crate::hw::{
    CaptureCounter, KeyDisplay, KeypadBus, ReportTimer, SerialTx, SpeedPwm, COLUMNS_RELEASED,
};

/// Matrix keypad with at most one key held.
#[derive(Debug, Default)]
pub struct MockKeypad {
    pressed: Option<(u8, u8)>,
    driven: Option<u8>,
    /// Column stuck low without any row responding (hardware fault model).
    ghost_column: Option<u8>,
}

impl MockKeypad {
    /// No key held.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Key at (`row`, `col`) held down.
    pub fn with_key(row: u8, col: u8) -> Self {
        Self {
            pressed: Some((row, col)),
            ..Self::default()
        }
    }

    /// A column stuck low that no row walk can explain.
    pub fn ghost(col: u8) -> Self {
        Self {
            ghost_column: Some(col),
            ..Self::default()
        }
    }

    /// Release the held key (mid-scan, for bounce tests).
    pub fn release_key(&mut self) {
        self.pressed = None;
    }

    /// Press a key (for multi-press sequences).
    pub fn press_key(&mut self, row: u8, col: u8) {
        self.pressed = Some((row, col));
    }
}

impl KeypadBus for MockKeypad {
    fn drive_row(&mut self, row: u8) {
        self.driven = Some(row);
    }

    fn release_row(&mut self, _row: u8) {
        self.driven = None;
    }

    fn read_columns(&self) -> u8 {
        if let Some(col) = self.ghost_column {
            return COLUMNS_RELEASED & !(1 << col);
        }
        match self.pressed {
            // Driving the pressed key's row high releases its column.
            Some((row, _)) if self.driven == Some(row) => COLUMNS_RELEASED,
            Some((_, col)) => COLUMNS_RELEASED & !(1 << col),
            None => COLUMNS_RELEASED,
        }
    }
}

/// PWM channel recording duty and enable state.
#[derive(Debug)]
pub struct MockPwm {
    max_duty: u32,
    duty: u32,
    enabled: bool,
}

impl MockPwm {
    /// Channel with the given full-scale compare value.
    pub fn with_max_duty(max_duty: u32) -> Self {
        Self {
            max_duty,
            duty: 0,
            enabled: false,
        }
    }

    /// Last programmed compare value.
    pub fn duty_ticks(&self) -> u32 {
        self.duty
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl SpeedPwm for MockPwm {
    fn set_duty_ticks(&mut self, ticks: u32) {
        self.duty = ticks;
    }

    fn max_duty_ticks(&self) -> u32 {
        self.max_duty
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }
}

/// Capture counter advanced manually by tests.
#[derive(Debug, Default)]
pub struct MockCapture {
    now: u32,
    enabled: bool,
}

impl MockCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the counter to an absolute tick value.
    pub fn set_counter(&mut self, ticks: u32) {
        self.now = ticks;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl CaptureCounter for MockCapture {
    fn counter(&mut self) -> u32 {
        self.now
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }
}

/// Report timer recording only its enable state.
#[derive(Debug, Default)]
pub struct MockReportTimer {
    enabled: bool,
}

impl MockReportTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl ReportTimer for MockReportTimer {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }
}

/// Serial sink capturing transmitted bytes.
#[derive(Debug, Default)]
pub struct MockSerial {
    sent: Vec<u8, 256>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything transmitted so far.
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl SerialTx for MockSerial {
    fn send_blocking(&mut self, bytes: &[u8]) {
        // Older frames fall off once the capture buffer is full.
        for &b in bytes {
            if self.sent.push(b).is_err() {
                break;
            }
        }
    }
}

/// Display remembering the last segment pattern shown.
#[derive(Debug, Default)]
pub struct MockDisplay {
    last: Option<u8>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_shown(&self) -> Option<u8> {
        self.last
    }
}

impl KeyDisplay for MockDisplay {
    fn show(&mut self, segments: u8) {
        self.last = Some(segments);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypad_models_row_release() {
        let mut bus = MockKeypad::with_key(2, 1);
        assert_eq!(bus.read_columns(), COLUMNS_RELEASED & !(1 << 1));
        bus.drive_row(2);
        assert_eq!(bus.read_columns(), COLUMNS_RELEASED);
        bus.release_row(2);
        bus.drive_row(0);
        assert_eq!(bus.read_columns(), COLUMNS_RELEASED & !(1 << 1));
    }

    #[test]
    fn serial_captures_bytes() {
        let mut tx = MockSerial::new();
        tx.send_blocking(b"abc");
        tx.send_blocking(b"d");
        assert_eq!(tx.sent(), b"abcd");
    }
}
