// SPDX-License-Identifier: MIT

//! Debounced two-phase scan of the keypad matrix.
//!
//! The column-edge interrupt handler calls [`Scan::begin`], which snapshots
//! the column lines, then arms a one-shot settle timer and returns. When the
//! settle delay expires, the timer handler calls [`PendingScan::confirm`],
//! which re-reads the columns and only decodes a key if the two reads agree
//! (settle-and-recompare debounce). Splitting the scan keeps the handlers
//! short: nothing busy-waits with other interrupt sources pending.
//!
//! The caller owns interrupt masking: the keypad source must be masked
//! before `begin` and re-armed (unmask + clear pending) after `confirm`
//! returns, on every outcome.

use crate::hw::{KeypadBus, COLUMNS_RELEASED};
use crate::keypad::layout::{self, Key, COLUMNS, ROWS};

/// Settle delay between the snapshot and the confirming re-read.
///
/// The settle window only needs to outlast mechanical contact bounce
/// (typically < 10 ms); 20 ms keeps margin without noticeable input lag.
pub const SETTLE_DELAY_MS: u32 = 20;

/// A confirmed key press: position plus decoded identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Pressed row, 0..4.
    pub row: u8,
    /// Pressed column, 0..4.
    pub column: u8,
    /// Semantic identity from the layout tables.
    pub key: Key,
    /// Seven-segment code for the feedback display.
    pub segments: u8,
}

/// Result of a completed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Stable press, decoded.
    Key(KeyEvent),
    /// Column reads differed across the settle window; contact bounce.
    Bounce,
    /// No pressed key could be located (spurious edge or malformed read).
    NoKey,
}

/// Entry point for a scan cycle.
pub struct Scan;

/// Snapshot taken at the interrupt edge, waiting for the settle re-read.
#[derive(Debug, Clone, Copy)]
pub struct PendingScan {
    snapshot: u8,
}

impl Scan {
    /// Snapshot the column lines at the interrupt edge.
    ///
    /// Call from the column-edge handler, after masking the keypad source.
    pub fn begin(bus: &mut impl KeypadBus) -> PendingScan {
        PendingScan {
            snapshot: bus.read_columns() & COLUMNS_RELEASED,
        }
    }
}

impl PendingScan {
    /// Re-read the columns after the settle delay and decode the key.
    ///
    /// Returns [`ScanOutcome::Bounce`] if the lines changed during the
    /// window, [`ScanOutcome::NoKey`] if no pressed position can be located.
    /// A malformed read must never default to key (0, 0); it reports
    /// `NoKey` and nothing is dispatched.
    pub fn confirm(self, bus: &mut impl KeypadBus) -> ScanOutcome {
        let now = bus.read_columns() & COLUMNS_RELEASED;
        if now != self.snapshot {
            return ScanOutcome::Bounce;
        }

        // All lines high means the edge was noise, not a held key.
        if self.snapshot == COLUMNS_RELEASED {
            return ScanOutcome::NoKey;
        }

        let Some(row) = locate_row(bus) else {
            return ScanOutcome::NoKey;
        };
        let Some(column) = locate_column(self.snapshot) else {
            return ScanOutcome::NoKey;
        };

        let index = 4 * row + column;
        ScanOutcome::Key(KeyEvent {
            row,
            column,
            key: layout::decode(index),
            segments: layout::segments(index),
        })
    }
}

/// Walk the rows to find the pressed one.
///
/// Driving the pressed key's row high lifts its column back to the pull-up
/// level, so the pressed row is the one for which every column reads
/// released while driven.
fn locate_row(bus: &mut impl KeypadBus) -> Option<u8> {
    let mut found = None;
    for row in 0..ROWS {
        bus.drive_row(row);
        let released = bus.read_columns() & COLUMNS_RELEASED == COLUMNS_RELEASED;
        bus.release_row(row);
        if released {
            found = Some(row);
            break;
        }
    }
    found
}

/// The pressed column is the first line reading low in the snapshot.
fn locate_column(snapshot: u8) -> Option<u8> {
    (0..COLUMNS).find(|&col| snapshot & (1 << col) == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::mock::MockKeypad;

    #[test]
    fn stable_press_decodes_position_and_key() {
        // Row 0, column 2 is '3'.
        let mut bus = MockKeypad::with_key(0, 2);
        let pending = Scan::begin(&mut bus);
        match pending.confirm(&mut bus) {
            ScanOutcome::Key(ev) => {
                assert_eq!((ev.row, ev.column), (0, 2));
                assert_eq!(ev.key, Key::Digit(3));
                assert_eq!(ev.segments, 0x4f);
            }
            other => panic!("expected key, got {:?}", other),
        }
    }

    #[test]
    fn every_position_round_trips() {
        for row in 0..4 {
            for col in 0..4 {
                let mut bus = MockKeypad::with_key(row, col);
                let outcome = Scan::begin(&mut bus).confirm(&mut bus);
                match outcome {
                    ScanOutcome::Key(ev) => {
                        assert_eq!((ev.row, ev.column), (row, col));
                        assert_eq!(ev.key, layout::decode(4 * row + col));
                    }
                    other => panic!("({}, {}): expected key, got {:?}", row, col, other),
                }
            }
        }
    }

    #[test]
    fn release_during_settle_is_bounce() {
        let mut bus = MockKeypad::with_key(1, 1);
        let pending = Scan::begin(&mut bus);
        bus.release_key();
        assert_eq!(pending.confirm(&mut bus), ScanOutcome::Bounce);
    }

    #[test]
    fn spurious_edge_with_idle_lines_is_no_key() {
        let mut bus = MockKeypad::idle();
        let pending = Scan::begin(&mut bus);
        assert_eq!(pending.confirm(&mut bus), ScanOutcome::NoKey);
    }

    #[test]
    fn ghost_press_without_row_match_is_no_key() {
        // Column stuck low but no row responds to the walk: must not decode
        // to key (0, 0).
        let mut bus = MockKeypad::ghost(2);
        let pending = Scan::begin(&mut bus);
        assert_eq!(pending.confirm(&mut bus), ScanOutcome::NoKey);
    }
}
