// SPDX-License-Identifier: MIT

//! Heart-rate estimation from capture-timer pulse edges.
//!
//! Each falling edge on the pulse input is timestamped by a free-running
//! counter ticking in 0.1 s units. [`PulseAverager`] keeps the last
//! [`WINDOW`] inter-edge periods in a circular buffer and publishes the
//! smoothed rate in pulses per minute. Until the buffer has wrapped once,
//! the mean runs over only the entries written so far, so early estimates
//! settle without waiting for ten beats.

/// Capture-counter rate. One tick = 0.1 s.
pub const CAPTURE_TICK_HZ: u32 = 10;

/// Ticks in one minute at [`CAPTURE_TICK_HZ`]; numerator of the ppm conversion.
pub const TICKS_PER_MINUTE: u32 = 60 * CAPTURE_TICK_HZ;

/// Number of periods in the moving-average window.
pub const WINDOW: usize = 10;

/// Periods at or below this many ticks are contact bounce, not pulses.
pub const MIN_PERIOD_TICKS: u32 = 1;

/// Circular history of inter-pulse periods with a running mean.
#[derive(Debug, Clone, Copy)]
pub struct PulseAverager {
    periods: [u32; WINDOW],
    cursor: usize,
    wrapped: bool,
    last_edge: u32,
}

impl Default for PulseAverager {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseAverager {
    /// Empty history; the first edge is measured against counter zero.
    pub const fn new() -> Self {
        Self {
            periods: [0; WINDOW],
            cursor: 0,
            wrapped: false,
            last_edge: 0,
        }
    }

    /// Record a capture edge at counter value `now` (capture ticks).
    ///
    /// Returns the updated rate estimate in pulses per minute, or `None` if
    /// the edge was rejected as bounce. A rejected edge still becomes the
    /// reference for the next period (it is a real electrical edge), but
    /// leaves the history and the published rate untouched.
    pub fn on_capture(&mut self, now: u32) -> Option<u16> {
        let period = now.wrapping_sub(self.last_edge);
        self.last_edge = now;
        if period <= MIN_PERIOD_TICKS {
            return None;
        }

        self.periods[self.cursor] = period;
        let filled = if self.wrapped { WINDOW } else { self.cursor + 1 };
        self.cursor += 1;
        if self.cursor == WINDOW {
            self.cursor = 0;
            self.wrapped = true;
        }

        // Widen before summing: ten worst-case periods overflow u32.
        let sum: u64 = self.periods[..filled].iter().map(|&p| p as u64).sum();
        let mean = (sum / filled as u64) as u32;
        // Unreachable while MIN_PERIOD_TICKS >= 1 keeps every stored period
        // positive; guarded anyway so a bookkeeping slip cannot divide by 0.
        if mean == 0 {
            return None;
        }

        Some((TICKS_PER_MINUTE / mean) as u16)
    }

    /// Number of periods currently contributing to the mean.
    pub fn filled(&self) -> usize {
        if self.wrapped {
            WINDOW
        } else {
            self.cursor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed consecutive periods as cumulative edge timestamps from `start`.
    ///
    /// `start` must continue where the previous feed left off, or the first
    /// period measures against the stale edge.
    fn feed(avg: &mut PulseAverager, start: u32, periods: &[u32]) -> Option<u16> {
        let mut t = start;
        let mut last = None;
        for &p in periods {
            t = t.wrapping_add(p);
            last = avg.on_capture(t);
        }
        last
    }

    #[test]
    fn steady_periods_full_window() {
        let mut avg = PulseAverager::new();
        // Ten periods of 1.0 s: mean 10 ticks, 60 pulses per minute.
        assert_eq!(feed(&mut avg, 0, &[10; 10]), Some(60));
        assert_eq!(avg.filled(), WINDOW);
    }

    #[test]
    fn first_period_uses_partial_window() {
        let mut avg = PulseAverager::new();
        // Single period of 1.2 s: mean 12 ticks, 600 / 12 = 50.
        assert_eq!(avg.on_capture(12), Some(50));
        assert_eq!(avg.filled(), 1);
    }

    #[test]
    fn partial_window_grows_per_edge() {
        let mut avg = PulseAverager::new();
        assert_eq!(avg.on_capture(10), Some(60)); // mean 10
        assert_eq!(avg.on_capture(30), Some(40)); // periods 10, 20 -> mean 15
        assert_eq!(avg.on_capture(60), Some(30)); // 10, 20, 30 -> mean 20
    }

    #[test]
    fn window_evicts_oldest_after_wrap() {
        let mut avg = PulseAverager::new();
        feed(&mut avg, 0, &[10; 10]);
        // Edges continue from t = 100. The eleventh period of 21 replaces
        // one 10: mean (9*10 + 21) / 10 = 11.
        assert_eq!(feed(&mut avg, 100, &[21]), Some(600 / 11));
        assert_eq!(avg.filled(), WINDOW);
    }

    #[test]
    fn bounce_period_rejected_without_side_effects() {
        let mut avg = PulseAverager::new();
        assert_eq!(avg.on_capture(10), Some(60));
        // Edge 1 tick later: bounce, no rate change, nothing stored.
        assert_eq!(avg.on_capture(11), None);
        assert_eq!(avg.filled(), 1);
        // Next real pulse measures from the bounce edge.
        assert_eq!(avg.on_capture(21), Some(60));
        assert_eq!(avg.filled(), 2);
    }

    #[test]
    fn zero_period_rejected() {
        let mut avg = PulseAverager::new();
        assert_eq!(avg.on_capture(0), None);
        assert_eq!(avg.filled(), 0);
    }

    #[test]
    fn counter_wraparound_is_safe() {
        let mut avg = PulseAverager::new();
        assert_eq!(avg.on_capture(u32::MAX - 4), Some(0)); // huge first period, rate floors at 0
        // Counter wraps between edges; the period is still 10 ticks.
        let after_wrap = avg.on_capture(5);
        assert!(after_wrap.is_some());
    }

    #[test]
    fn integer_truncation_matches_contract() {
        let mut avg = PulseAverager::new();
        // Periods 10 and 13: mean truncates to 11, rate truncates to 54.
        avg.on_capture(10);
        assert_eq!(avg.on_capture(23), Some(600 / 11));
    }
}
