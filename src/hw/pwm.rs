// SPDX-License-Identifier: MIT

//! Belt motor PWM on TIM3 channel 1 (PA6, AF2).
//!
//! Configured with ARR and CCR1 preload enabled, so a compare value written
//! mid-cycle latches at the next update event instead of tearing the active
//! pulse.

use stm32f7xx_hal::pac;

use crate::hw::SpeedPwm;

/// Counter ticks per PWM period. At the 16 MHz APB1 timer clock with /1
/// prescale this gives a ~10.7 kHz carrier; 1500 divides evenly by the
/// 15 km/h full scale.
pub const PWM_PERIOD_TICKS: u32 = 1500;

/// PWM channel for the belt drive motor.
pub struct BeltPwm {
    tim: pac::TIM3,
}

impl BeltPwm {
    /// Configure TIM3 CH1 for edge-aligned PWM, output disabled, duty zero.
    ///
    /// The caller routes PA6 to AF2 beforehand.
    pub fn new(tim: pac::TIM3) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim3en().set_bit());

        tim.cr1.modify(|_, w| w.cen().clear_bit());

        tim.psc.write(|w| w.psc().bits(0));
        tim.arr.write(|w| unsafe { w.bits(PWM_PERIOD_TICKS - 1) });
        tim.ccr1.write(|w| unsafe { w.bits(0) });

        // PWM mode 1 with compare preload; ARR preload as well.
        tim.ccmr1_output()
            .modify(|_, w| unsafe { w.oc1m().bits(0b110).oc1pe().set_bit() });
        tim.cr1.modify(|_, w| w.arpe().set_bit());

        // Load the prescaler and compare registers.
        tim.egr.write(|w| w.ug().set_bit());

        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }
}

impl SpeedPwm for BeltPwm {
    fn set_duty_ticks(&mut self, ticks: u32) {
        // Takes effect at the next update event (OC1PE).
        self.tim.ccr1.write(|w| unsafe { w.bits(ticks) });
    }

    fn max_duty_ticks(&self) -> u32 {
        PWM_PERIOD_TICKS
    }

    fn enable(&mut self) {
        self.tim.ccer.modify(|_, w| w.cc1e().set_bit());
    }

    fn disable(&mut self) {
        self.tim.ccer.modify(|_, w| w.cc1e().clear_bit());
    }
}
