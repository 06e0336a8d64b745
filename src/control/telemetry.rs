// SPDX-License-Identifier: MIT

//! Periodic telemetry frame: rate, speed, and optionally temperature.
//!
//! The report-timer handler snapshots the shared state, renders one line of
//! text, and pushes it out the serial port with a blocking write. Plain
//! decimal formatting keeps single-digit values single-character (no zero
//! padding).

use core::fmt::Write;

use heapless::String;

use crate::hw::SerialTx;

/// Upper bound for a rendered frame; the template plus worst-case numbers
/// stays well under this.
pub const FRAME_CAPACITY: usize = 64;

/// Telemetry report interval in seconds.
///
/// Slow enough to keep the blocking transmit negligible, fast enough to
/// follow a workout. The timer match derives from this constant and the
/// prescaled tick rate, never from a hard-coded match value.
pub const REPORT_PERIOD_S: u32 = 10;

/// ADC counts at full scale (12-bit conversion).
pub const TEMP_ADC_FULL_SCALE: u32 = 4095;

/// Sensor reading at full scale, tenths of a degree Celsius. The LM35-style
/// front end spans 0..=3.3 V, 10 mV per degree: 330 d°C over the ADC range.
pub const TEMP_FULL_SCALE_DC: u32 = 330;

/// One telemetry report, built from a state snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryFrame {
    /// Smoothed heart-rate estimate, pulses per minute.
    pub rate_ppm: u16,
    /// Current speed setpoint, km/h.
    pub speed_kmh: u8,
    /// Ambient temperature in tenths of a degree, when sampled.
    pub temp_dc: Option<i16>,
}

impl TelemetryFrame {
    /// Render the frame as one CRLF-terminated text line.
    pub fn render(&self) -> String<FRAME_CAPACITY> {
        let mut line = String::new();
        // Capacity is sized for the worst case; a format error is impossible.
        let _ = write!(line, "Rate: {} ppm, Speed: {} km/h", self.rate_ppm, self.speed_kmh);
        if let Some(dc) = self.temp_dc {
            // Sign rendered separately: `dc / 10` is 0 for -9..=-1 and would
            // lose the minus.
            let sign = if dc < 0 { "-" } else { "" };
            let mag = dc.unsigned_abs();
            let _ = write!(line, ", Temp: {}{}.{} C", sign, mag / 10, mag % 10);
        }
        let _ = line.push_str("\r\n");
        line
    }

    /// Render and transmit over the serial channel, blocking until done.
    pub fn send(&self, tx: &mut impl SerialTx) {
        tx.send_blocking(self.render().as_bytes());
    }
}

/// Linear scaling from raw ADC counts to tenths of a degree Celsius.
pub fn celsius_from_counts(raw: u16) -> i16 {
    (raw as u32 * TEMP_FULL_SCALE_DC / TEMP_ADC_FULL_SCALE) as i16
}
