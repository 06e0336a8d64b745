// SPDX-License-Identifier: MIT

//! # Matrix Keypad
//!
//! Layout tables and debounced scanning for the 4x4 matrix keypad.
//!
//! ## Modules
//!
//! - [`layout`] - Fixed key tables (seven-segment codes, digit values) and semantic decode.
//! - [`scanner`] - Two-phase settle-and-recompare scan driven from interrupt context.

pub mod layout;
pub mod scanner;

pub use layout::Key;
pub use scanner::{KeyEvent, Scan, ScanOutcome};
