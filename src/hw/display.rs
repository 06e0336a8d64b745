// SPDX-License-Identifier: MIT

//! Seven-segment feedback display on GPIOE pins 0..6.

use stm32f7xx_hal::pac;

use crate::hw::KeyDisplay;

const SEGMENT_MASK: u32 = 0x7f;

/// One-character seven-segment display, segments a..g on PE0..PE6.
pub struct SevenSeg {
    gpio: pac::GPIOE,
}

impl SevenSeg {
    /// Configure PE0..PE6 as push-pull outputs, blanked.
    pub fn new(gpio: pac::GPIOE) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.ahb1enr.modify(|_, w| w.gpioeen().set_bit());

        gpio.moder.modify(|r, w| unsafe {
            let mut bits = r.bits() & !0x3fff;
            for pin in 0..7 {
                bits |= 0b01 << (2 * pin);
            }
            w.bits(bits)
        });
        gpio.bsrr.write(|w| unsafe { w.bits(SEGMENT_MASK << 16) });

        Self { gpio }
    }

    /// Blank the display.
    pub fn clear(&mut self) {
        self.gpio.bsrr.write(|w| unsafe { w.bits(SEGMENT_MASK << 16) });
    }
}

impl KeyDisplay for SevenSeg {
    fn show(&mut self, segments: u8) {
        self.gpio.odr.modify(|r, w| unsafe {
            w.bits((r.bits() & !SEGMENT_MASK) | (segments as u32 & SEGMENT_MASK))
        });
    }
}
