// SPDX-License-Identifier: MIT

//! The three timers behind the interrupt-driven core: pulse capture (TIM2),
//! periodic telemetry (TIM7), and the debounce settle one-shot (TIM6).
//!
//! All three count at 1 kHz: the 16 MHz APB1 timer clock through a /16000
//! prescaler. TIM2's raw counter rolls over after ~49 days; pulse timestamps
//! go through a [`TickConverter`] so the 0.1 s tick values handed to the
//! averager stay consistent modulo 2^32 across the rollover.

use stm32f7xx_hal::pac;

use crate::control::telemetry::REPORT_PERIOD_S;
use crate::hw::ticks::{TickConverter, RAW_COUNT_HZ};
use crate::hw::{CaptureCounter, ReportTimer};
use crate::keypad::scanner::SETTLE_DELAY_MS;

/// Timer input clock: HSI 16 MHz, default clock tree (no PLL).
const TIMER_CLOCK_HZ: u32 = 16_000_000;

/// Counter rate after prescale, for all three timers.
const COUNT_HZ: u32 = RAW_COUNT_HZ;

const PRESCALER: u16 = (TIMER_CLOCK_HZ / COUNT_HZ - 1) as u16;

/// Pulse capture on TIM2 channel 1 (PA0, AF1), falling edge.
pub struct PulseCapture {
    tim: pac::TIM2,
    ticks: TickConverter,
}

impl PulseCapture {
    /// Free-running 32-bit counter at 1 kHz, capture interrupt disabled.
    pub fn new(tim: pac::TIM2) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.psc.write(|w| w.psc().bits(PRESCALER));
        tim.arr.write(|w| unsafe { w.bits(0xffff_ffff) });

        // CH1 input mapped to TI1, falling edge, capture enabled.
        tim.ccmr1_input().modify(|_, w| unsafe { w.cc1s().bits(0b01) });
        tim.ccer
            .modify(|_, w| w.cc1p().set_bit().cc1np().clear_bit().cc1e().set_bit());

        tim.cnt.write(|w| unsafe { w.bits(0) });
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self {
            tim,
            ticks: TickConverter::new(),
        }
    }

    /// Clear the capture-pending flag (call from the handler).
    pub fn clear_capture_flag(&mut self) {
        self.tim.sr.modify(|_, w| w.cc1if().clear_bit());
    }
}

impl CaptureCounter for PulseCapture {
    fn counter(&mut self) -> u32 {
        self.ticks.update(self.tim.cnt.read().bits())
    }

    fn enable(&mut self) {
        self.clear_capture_flag();
        self.tim.dier.modify(|_, w| w.cc1ie().set_bit());
    }

    fn disable(&mut self) {
        self.tim.dier.modify(|_, w| w.cc1ie().clear_bit());
    }
}

/// Telemetry pacing on TIM7's update event.
pub struct ReportClock {
    tim: pac::TIM7,
}

impl ReportClock {
    /// Update event every [`REPORT_PERIOD_S`] seconds, interrupt disabled.
    pub fn new(tim: pac::TIM7) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim7en().set_bit());

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.psc.write(|w| w.psc().bits(PRESCALER));
        tim.arr
            .write(|w| unsafe { w.bits(REPORT_PERIOD_S * COUNT_HZ - 1) });
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }

    /// Clear the period-elapsed flag (call from the handler).
    pub fn clear_update_flag(&mut self) {
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
    }
}

impl ReportTimer for ReportClock {
    fn enable(&mut self) {
        self.tim.cnt.write(|w| unsafe { w.bits(0) });
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
        self.tim.dier.modify(|_, w| w.uie().set_bit());
    }

    fn disable(&mut self) {
        self.tim.dier.modify(|_, w| w.uie().clear_bit());
    }
}

/// One-shot settle delay for keypad debounce, on TIM6.
pub struct SettleTimer {
    tim: pac::TIM6,
}

impl SettleTimer {
    /// One-pulse timer firing [`SETTLE_DELAY_MS`] after [`start`](Self::start).
    pub fn new(tim: pac::TIM6) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim6en().set_bit());

        tim.cr1.modify(|_, w| w.cen().clear_bit().opm().set_bit());
        tim.psc.write(|w| w.psc().bits(PRESCALER));
        tim.arr
            .write(|w| unsafe { w.bits(SETTLE_DELAY_MS * COUNT_HZ / 1_000 - 1) });
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());
        tim.dier.modify(|_, w| w.uie().set_bit());

        Self { tim }
    }

    /// Arm the one-shot: the update interrupt fires once after the delay.
    pub fn start(&mut self) {
        self.tim.cnt.write(|w| unsafe { w.bits(0) });
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
        self.tim.cr1.modify(|_, w| w.cen().set_bit());
    }

    /// Clear the elapsed flag (call from the handler).
    pub fn clear_update_flag(&mut self) {
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
    }
}
