// SPDX-License-Identifier: MIT

//! Raw-counter to capture-tick conversion for the pulse timestamp source.
//!
//! The capture timer's free-running counter advances at [`RAW_COUNT_HZ`]
//! (1 kHz), but pulse timestamps are consumed in 0.1 s capture ticks.
//! Dividing the raw count itself would break the averager's wrap-safe
//! period subtraction: 2^32 raw counts is not a whole number of ticks, so
//! the quotient jumps backwards when the counter rolls over.
//!
//! [`TickConverter`] instead subtracts consecutive raw readings with
//! `wrapping_sub` and folds the elapsed amount into a running tick count.
//! The division lands on the elapsed raw counts, never on the absolute
//! counter, so the produced tick values stay consistent modulo 2^32 across
//! rollovers of the raw counter.

use crate::control::averager::CAPTURE_TICK_HZ;

/// Rate of the raw hardware counter feeding the converter.
pub const RAW_COUNT_HZ: u32 = 1_000;

/// Raw counts per capture tick (1 kHz counter down to 0.1 s units).
pub const RAW_PER_CAPTURE_TICK: u32 = RAW_COUNT_HZ / CAPTURE_TICK_HZ;

/// Folds a wrapping raw counter into a wrapping capture-tick count.
///
/// Feed every raw reading through [`update`](Self::update); readings must
/// arrive at least once per raw-counter rollover (~49 days at 1 kHz), which
/// the capture interrupt guarantees while tracking runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickConverter {
    last_raw: u32,
    ticks: u32,
    rem_raw: u32,
}

impl TickConverter {
    /// Converter synchronized to raw count zero, tick count zero.
    pub const fn new() -> Self {
        Self {
            last_raw: 0,
            ticks: 0,
            rem_raw: 0,
        }
    }

    /// Advance with the current raw counter value and return the tick count.
    ///
    /// Raw counts that do not complete a tick carry over to the next call,
    /// so no time is lost to truncation.
    pub fn update(&mut self, raw: u32) -> u32 {
        let elapsed = raw.wrapping_sub(self.last_raw);
        self.last_raw = raw;

        // Widen: the carry plus a near-full-range elapsed exceeds u32.
        let total = self.rem_raw as u64 + elapsed as u64;
        self.ticks = self
            .ticks
            .wrapping_add((total / RAW_PER_CAPTURE_TICK as u64) as u32);
        self.rem_raw = (total % RAW_PER_CAPTURE_TICK as u64) as u32;
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::averager::PulseAverager;

    #[test]
    fn whole_ticks_accumulate() {
        let mut conv = TickConverter::new();
        assert_eq!(conv.update(100), 1);
        assert_eq!(conv.update(1_000), 10);
    }

    #[test]
    fn sub_tick_remainder_carries_over() {
        let mut conv = TickConverter::new();
        assert_eq!(conv.update(150), 1);
        // 50 raw counts carried; 50 more complete the second tick.
        assert_eq!(conv.update(200), 2);
    }

    #[test]
    fn tick_deltas_consistent_across_raw_rollover() {
        let mut conv = TickConverter::new();
        let before = conv.update(u32::MAX - 400);
        // 1000 raw counts later the raw counter has rolled over.
        let after = conv.update((u32::MAX - 400).wrapping_add(1_000));
        assert_eq!(after.wrapping_sub(before), 10);
    }

    #[test]
    fn rate_unaffected_by_raw_rollover() {
        let mut conv = TickConverter::new();
        let mut avg = PulseAverager::new();
        // Edges 1 s apart straddling the raw-counter rollover. The first
        // period is a bogus from-reset span; ten more fill the window with
        // clean 10-tick periods and evict it.
        let start = u32::MAX - 5_500;
        let mut rate = None;
        for i in 0..=10u32 {
            let raw = start.wrapping_add(i * 1_000);
            rate = avg.on_capture(conv.update(raw));
        }
        assert_eq!(rate, Some(60));
    }
}
