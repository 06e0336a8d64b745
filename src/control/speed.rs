// SPDX-License-Identifier: MIT

//! Speed setpoint to PWM duty mapping.
//!
//! Thin actuator wrapper over a [`SpeedPwm`] channel: validates the
//! commanded speed and maps it linearly onto the channel's duty range. The
//! channel contract latches the new compare value at the next period edge,
//! so a running belt never sees a torn duty value.

use crate::control::state::MAX_SPEED_KMH;
use crate::hw::SpeedPwm;

/// Rejected speed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedError {
    /// Commanded value exceeds [`MAX_SPEED_KMH`].
    OutOfRange(u8),
}

/// Belt drive: owns the PWM channel for the motor.
pub struct SpeedDrive<P: SpeedPwm> {
    pwm: P,
}

impl<P: SpeedPwm> SpeedDrive<P> {
    /// Wrap a PWM channel. The channel starts disabled at zero duty.
    pub fn new(mut pwm: P) -> Self {
        pwm.set_duty_ticks(0);
        pwm.disable();
        Self { pwm }
    }

    /// Enable the PWM output (power-on side effect).
    pub fn enable(&mut self) {
        self.pwm.enable();
    }

    /// Command a belt speed in km/h.
    ///
    /// `duty = kmh * (max_duty / MAX_SPEED_KMH)`, so full scale lands on
    /// 100% duty. Out-of-range values are rejected, never truncated.
    pub fn set_speed(&mut self, kmh: u8) -> Result<(), SpeedError> {
        if kmh > MAX_SPEED_KMH {
            return Err(SpeedError::OutOfRange(kmh));
        }
        let per_kmh = self.pwm.max_duty_ticks() / MAX_SPEED_KMH as u32;
        self.pwm.set_duty_ticks(kmh as u32 * per_kmh);
        Ok(())
    }

    /// Zero the duty and disable the output (stop side effect).
    pub fn shutdown(&mut self) {
        self.pwm.set_duty_ticks(0);
        self.pwm.disable();
    }

    /// Access the underlying channel.
    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::mock::MockPwm;

    #[test]
    fn duty_scales_linearly() {
        let mut drive = SpeedDrive::new(MockPwm::with_max_duty(1500));
        drive.set_speed(1).unwrap();
        assert_eq!(drive.pwm().duty_ticks(), 100);
        drive.set_speed(15).unwrap();
        assert_eq!(drive.pwm().duty_ticks(), 1500);
        drive.set_speed(0).unwrap();
        assert_eq!(drive.pwm().duty_ticks(), 0);
    }

    #[test]
    fn out_of_range_rejected_not_truncated() {
        let mut drive = SpeedDrive::new(MockPwm::with_max_duty(1500));
        drive.set_speed(7).unwrap();
        assert_eq!(drive.set_speed(16), Err(SpeedError::OutOfRange(16)));
        // Last accepted duty survives the rejection.
        assert_eq!(drive.pwm().duty_ticks(), 700);
    }

    #[test]
    fn shutdown_zeroes_and_disables() {
        let mut drive = SpeedDrive::new(MockPwm::with_max_duty(1500));
        drive.enable();
        drive.set_speed(10).unwrap();
        drive.shutdown();
        assert_eq!(drive.pwm().duty_ticks(), 0);
        assert!(!drive.pwm().enabled());
    }
}
