// SPDX-License-Identifier: MIT

//! Command dispatch: decoded keys onto the shared control state.
//!
//! [`handle_key`] runs inside the keypad handler's settle phase, so it is
//! never re-entered; it must leave [`ControlState`] internally consistent
//! before returning. Side effects on peripherals go through the
//! [`Actuation`] trait so the dispatch logic tests on the host.

use crate::control::state::{ControlState, MAX_SPEED_KMH};
use crate::keypad::Key;

/// Peripheral side effects commanded by key dispatch.
pub trait Actuation {
    /// Drive the belt at `kmh` (caller guarantees `kmh <= MAX_SPEED_KMH`).
    fn apply_speed(&mut self, kmh: u8);

    /// Activation on power-on: enable the PWM subsystem.
    fn power_up(&mut self);

    /// Full stop: duty to zero, PWM, capture and report sources disabled.
    fn shutdown(&mut self);

    /// Enable the capture and report interrupt sources.
    fn start_tracking(&mut self);
}

/// Why a key was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reject {
    /// A third digit arrived while two were already pending.
    DigitBufferFull,
    /// The entered value exceeds [`MAX_SPEED_KMH`]; carries the value.
    SpeedAboveLimit(u8),
    /// Increment pressed with the setpoint already at the ceiling.
    AtMaxSpeed,
    /// Decrement pressed with the setpoint already at zero.
    AtMinSpeed,
}

/// What a dispatched key did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Belt powered on (or power key repeated while already on).
    PoweredOn,
    /// Pending digits committed; carries the new setpoint.
    SpeedSet(u8),
    /// Setpoint bumped up or down; carries the new setpoint.
    SpeedChanged(u8),
    /// Digit appended to the pending entry.
    DigitStored(u8),
    /// Powered off and reset.
    Stopped,
    /// Heart-rate tracking and telemetry enabled.
    TrackingStarted,
    /// Key arrived while powered off; no state change.
    Ignored,
    /// Key was valid but its effect is not allowed right now.
    Rejected(Reject),
}

/// Dispatch one debounced key press.
///
/// While powered off every key but [`Key::Power`] is inert (the display echo
/// happens upstream, before dispatch). Repeated stops while off are no-ops.
pub fn handle_key(state: &mut ControlState, key: Key, act: &mut impl Actuation) -> KeyOutcome {
    if !state.powered {
        if key == Key::Power {
            state.powered = true;
            act.power_up();
            return KeyOutcome::PoweredOn;
        }
        return KeyOutcome::Ignored;
    }

    match key {
        Key::Power => {
            // Already on; repeating the activation side effect is harmless.
            act.power_up();
            KeyOutcome::PoweredOn
        }

        Key::SetSpeed => {
            let entered = state.digits.value();
            state.digits.clear();
            if entered > MAX_SPEED_KMH {
                return KeyOutcome::Rejected(Reject::SpeedAboveLimit(entered));
            }
            state.speed_kmh = entered;
            act.apply_speed(entered);
            KeyOutcome::SpeedSet(entered)
        }

        Key::Stop => {
            state.powered = false;
            state.tracking = false;
            state.speed_kmh = 0;
            state.digits.clear();
            act.shutdown();
            KeyOutcome::Stopped
        }

        Key::Track => {
            state.tracking = true;
            act.start_tracking();
            KeyOutcome::TrackingStarted
        }

        Key::SpeedUp => {
            if state.speed_kmh >= MAX_SPEED_KMH {
                return KeyOutcome::Rejected(Reject::AtMaxSpeed);
            }
            state.speed_kmh += 1;
            act.apply_speed(state.speed_kmh);
            KeyOutcome::SpeedChanged(state.speed_kmh)
        }

        Key::SpeedDown => {
            if state.speed_kmh == 0 {
                return KeyOutcome::Rejected(Reject::AtMinSpeed);
            }
            state.speed_kmh -= 1;
            act.apply_speed(state.speed_kmh);
            KeyOutcome::SpeedChanged(state.speed_kmh)
        }

        Key::Digit(d) => match state.digits.push(d) {
            Ok(()) => KeyOutcome::DigitStored(d),
            Err(_) => KeyOutcome::Rejected(Reject::DigitBufferFull),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records which side effects fired, in order.
    #[derive(Default)]
    struct Recorder {
        speeds: Vec<u8>,
        power_ups: u32,
        shutdowns: u32,
        tracking_starts: u32,
    }

    impl Actuation for Recorder {
        fn apply_speed(&mut self, kmh: u8) {
            self.speeds.push(kmh);
        }
        fn power_up(&mut self) {
            self.power_ups += 1;
        }
        fn shutdown(&mut self) {
            self.shutdowns += 1;
        }
        fn start_tracking(&mut self) {
            self.tracking_starts += 1;
        }
    }

    fn powered() -> (ControlState, Recorder) {
        let mut state = ControlState::new();
        let mut act = Recorder::default();
        assert_eq!(
            handle_key(&mut state, Key::Power, &mut act),
            KeyOutcome::PoweredOn
        );
        assert_eq!(act.power_ups, 1);
        (state, act)
    }

    #[test]
    fn keys_inert_while_off() {
        let mut state = ControlState::new();
        let mut act = Recorder::default();
        for key in [
            Key::Digit(5),
            Key::SetSpeed,
            Key::Track,
            Key::SpeedUp,
            Key::SpeedDown,
        ] {
            assert_eq!(handle_key(&mut state, key, &mut act), KeyOutcome::Ignored);
        }
        assert_eq!(state, ControlState::new());
        assert!(act.speeds.is_empty());
    }

    #[test]
    fn digits_then_confirm_sets_speed() {
        let (mut state, mut act) = powered();
        assert_eq!(
            handle_key(&mut state, Key::Digit(1), &mut act),
            KeyOutcome::DigitStored(1)
        );
        assert_eq!(
            handle_key(&mut state, Key::Digit(5), &mut act),
            KeyOutcome::DigitStored(5)
        );
        assert_eq!(
            handle_key(&mut state, Key::SetSpeed, &mut act),
            KeyOutcome::SpeedSet(15)
        );
        assert_eq!(state.speed_kmh, 15);
        assert!(state.digits.is_empty());
        assert_eq!(act.speeds, [15]);
    }

    #[test]
    fn single_digit_confirm_reads_tens_place() {
        let (mut state, mut act) = powered();
        handle_key(&mut state, Key::Digit(1), &mut act);
        assert_eq!(
            handle_key(&mut state, Key::SetSpeed, &mut act),
            KeyOutcome::SpeedSet(10)
        );
    }

    #[test]
    fn over_limit_entry_rejected_and_setpoint_kept() {
        let (mut state, mut act) = powered();
        handle_key(&mut state, Key::Digit(9), &mut act);
        handle_key(&mut state, Key::Digit(9), &mut act);
        assert_eq!(
            handle_key(&mut state, Key::SetSpeed, &mut act),
            KeyOutcome::Rejected(Reject::SpeedAboveLimit(99))
        );
        assert_eq!(state.speed_kmh, 0);
        // Buffer cleared so the next entry starts fresh.
        assert!(state.digits.is_empty());
        assert!(act.speeds.is_empty());
    }

    #[test]
    fn third_digit_rejected() {
        let (mut state, mut act) = powered();
        handle_key(&mut state, Key::Digit(1), &mut act);
        handle_key(&mut state, Key::Digit(2), &mut act);
        assert_eq!(
            handle_key(&mut state, Key::Digit(3), &mut act),
            KeyOutcome::Rejected(Reject::DigitBufferFull)
        );
        assert_eq!(state.digits.value(), 12);
    }

    #[test]
    fn increment_and_decrement_respect_bounds() {
        let (mut state, mut act) = powered();
        assert_eq!(
            handle_key(&mut state, Key::SpeedDown, &mut act),
            KeyOutcome::Rejected(Reject::AtMinSpeed)
        );
        for expect in 1..=MAX_SPEED_KMH {
            assert_eq!(
                handle_key(&mut state, Key::SpeedUp, &mut act),
                KeyOutcome::SpeedChanged(expect)
            );
        }
        assert_eq!(
            handle_key(&mut state, Key::SpeedUp, &mut act),
            KeyOutcome::Rejected(Reject::AtMaxSpeed)
        );
        assert_eq!(state.speed_kmh, MAX_SPEED_KMH);
        assert_eq!(
            handle_key(&mut state, Key::SpeedDown, &mut act),
            KeyOutcome::SpeedChanged(MAX_SPEED_KMH - 1)
        );
    }

    #[test]
    fn setpoint_never_leaves_range() {
        // Arbitrary mixed sequence; the invariant must hold after every step.
        let (mut state, mut act) = powered();
        let keys = [
            Key::SpeedUp,
            Key::Digit(1),
            Key::Digit(4),
            Key::SetSpeed,
            Key::SpeedUp,
            Key::SpeedUp,
            Key::SpeedUp,
            Key::Digit(9),
            Key::Digit(9),
            Key::SetSpeed,
            Key::SpeedDown,
            Key::SetSpeed,
        ];
        for key in keys {
            let _ = handle_key(&mut state, key, &mut act);
            assert!(state.speed_kmh <= MAX_SPEED_KMH);
        }
    }

    #[test]
    fn stop_resets_and_is_idempotent() {
        let (mut state, mut act) = powered();
        handle_key(&mut state, Key::Digit(1), &mut act);
        handle_key(&mut state, Key::Track, &mut act);
        assert_eq!(
            handle_key(&mut state, Key::Stop, &mut act),
            KeyOutcome::Stopped
        );
        assert_eq!(state, ControlState::new());
        assert_eq!(act.shutdowns, 1);

        // Further stops while off change nothing.
        assert_eq!(
            handle_key(&mut state, Key::Stop, &mut act),
            KeyOutcome::Ignored
        );
        assert_eq!(state, ControlState::new());
        assert_eq!(act.shutdowns, 1);
    }

    #[test]
    fn track_enables_tracking() {
        let (mut state, mut act) = powered();
        assert_eq!(
            handle_key(&mut state, Key::Track, &mut act),
            KeyOutcome::TrackingStarted
        );
        assert!(state.tracking);
        assert_eq!(act.tracking_starts, 1);
    }
}
