// SPDX-License-Identifier: MIT

//! # Control Logic
//!
//! The interrupt-driven core of the controller, hardware-free and fully
//! host-testable.
//!
//! ## Modules
//!
//! - [`state`] - The shared [`ControlState`] mutated by the interrupt handlers.
//! - [`interpreter`] - Key dispatch onto the state, with explicit outcomes.
//! - [`speed`] - Setpoint to PWM duty mapping.
//! - [`averager`] - Pulse-period history and heart-rate estimation.
//! - [`telemetry`] - Periodic report formatting and transmission.

pub mod averager;
pub mod interpreter;
pub mod speed;
pub mod state;
pub mod telemetry;

pub use averager::PulseAverager;
pub use interpreter::{handle_key, Actuation, KeyOutcome, Reject};
pub use speed::{SpeedDrive, SpeedError};
pub use state::{ControlState, DigitBuffer, MAX_SPEED_KMH};
pub use telemetry::TelemetryFrame;
