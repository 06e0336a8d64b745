// SPDX-License-Identifier: MIT

//! # Treadmill Controller Firmware
//!
//! Interrupt-driven controller for a motorized treadmill with a 4x4 matrix
//! keypad, PWM speed actuation, heart-rate pulse capture, and periodic serial
//! telemetry, targeting an STM32F777 MCU.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | Peripheral traits, STM32 implementations, and test mocks |
//! | [`keypad`] | Matrix-keypad layout tables and debounced scanning |
//! | [`control`] | Shared control state, command dispatch, pulse averaging, telemetry |
//!
//! All control logic lives behind the small peripheral traits in [`hw`], so
//! the whole state machine runs on the host under `cargo test`. The firmware
//! binary (interrupt handlers and STM32 wiring) is gated behind the `stm32`
//! feature:
//!
//! ```bash
//! cargo build --features stm32 --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.

#![cfg_attr(not(test), no_std)]

pub mod control;
pub mod hw;
pub mod keypad;
