// SPDX-License-Identifier: MIT

//! # Peripheral Layer
//!
//! Small traits for the peripherals the control logic touches, their STM32F7
//! implementations, and in-memory mocks for host tests.
//!
//! ## Modules
//!
//! - [`mock`] - State-recording implementations of every trait, for tests.
//! - [`ticks`] - Wrap-safe raw-counter to capture-tick conversion.
//! - `keypad_port`, `display`, `pwm`, `timers`, `usart`, `adc` - STM32F777
//!   implementations, available with the `stm32` feature.

pub mod mock;
pub mod ticks;

#[cfg(feature = "stm32")]
pub mod adc;
#[cfg(feature = "stm32")]
pub mod display;
#[cfg(feature = "stm32")]
pub mod keypad_port;
#[cfg(feature = "stm32")]
pub mod pwm;
#[cfg(feature = "stm32")]
pub mod timers;
#[cfg(feature = "stm32")]
pub mod usart;

/// Column-line bit pattern when no key pulls a line low (4-bit, idle-high).
pub const COLUMNS_RELEASED: u8 = 0x0f;

/// Row-drive and column-read access to the keypad matrix.
///
/// Rows idle low; a pressed key shorts its row to its column, pulling the
/// pulled-up column line low and firing the falling-edge interrupt. Driving
/// the pressed key's row high releases its column back to the pull-up level.
pub trait KeypadBus {
    /// Drive row `row` (0..4) to the active (high) level.
    fn drive_row(&mut self, row: u8);

    /// Return row `row` to its idle (low) level.
    fn release_row(&mut self, row: u8);

    /// Read the four column lines as the low nibble, 1 = released.
    fn read_columns(&self) -> u8;
}

/// Double-buffered PWM channel driving the belt motor.
///
/// A duty value written while the counter runs must latch at the next period
/// edge, never mid-cycle.
pub trait SpeedPwm {
    /// Program the compare value, in timer ticks, applied at the next period edge.
    fn set_duty_ticks(&mut self, ticks: u32);

    /// Compare value corresponding to 100% duty.
    fn max_duty_ticks(&self) -> u32;

    /// Enable the PWM output.
    fn enable(&mut self);

    /// Disable the PWM output.
    fn disable(&mut self);
}

/// Free-running counter timestamping heart-rate pulse edges.
pub trait CaptureCounter {
    /// Current counter value in capture ticks (0.1 s units), monotonic,
    /// wrapping. Takes `&mut self`: reading may advance conversion state
    /// held between samples.
    fn counter(&mut self) -> u32;

    /// Enable the capture-edge interrupt source.
    fn enable(&mut self);

    /// Disable the capture-edge interrupt source.
    fn disable(&mut self);
}

/// Periodic match timer pacing telemetry reports.
pub trait ReportTimer {
    /// Enable the periodic match interrupt.
    fn enable(&mut self);

    /// Disable the periodic match interrupt.
    fn disable(&mut self);
}

/// Blocking byte-stream transmitter for telemetry frames.
pub trait SerialTx {
    /// Transmit `bytes`, blocking until the hardware has accepted all of them.
    fn send_blocking(&mut self, bytes: &[u8]);
}

/// Single-character feedback display (seven-segment).
pub trait KeyDisplay {
    /// Show the given segment pattern (bit 0 = segment a .. bit 6 = segment g).
    fn show(&mut self, segments: u8);
}
