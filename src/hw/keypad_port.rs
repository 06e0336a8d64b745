// SPDX-License-Identifier: MIT

//! Keypad matrix port on GPIOD with EXTI falling-edge interrupts.
//!
//! Wiring: rows on PD0..PD3 as push-pull outputs idling low, columns on
//! PD4..PD7 as pulled-up inputs. A key press shorts its row to its column
//! and pulls the column low, firing EXTI4 or EXTI9_5. Row walking during a
//! scan drives one row high at a time.

use stm32f7xx_hal::pac;

use crate::hw::KeypadBus;

/// EXTI lines used by the column inputs (PD4..PD7).
const COLUMN_LINES: u32 = 0xf0;

/// Keypad matrix port. Owns GPIOD and the EXTI controller.
pub struct KeypadPort {
    gpio: pac::GPIOD,
    exti: pac::EXTI,
}

impl KeypadPort {
    /// Configure the matrix pins and arm the column-edge interrupts.
    ///
    /// The caller still has to unmask `EXTI4` and `EXTI9_5` in the NVIC.
    pub fn new(gpio: pac::GPIOD, exti: pac::EXTI, syscfg: &pac::SYSCFG) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.ahb1enr.modify(|_, w| w.gpioden().set_bit());
        rcc.apb2enr.modify(|_, w| w.syscfgen().set_bit());

        // PD0..PD3 outputs (rows), PD4..PD7 inputs (columns).
        gpio.moder.modify(|r, w| unsafe {
            let mut bits = r.bits() & !0xffff;
            bits |= 0b01 | (0b01 << 2) | (0b01 << 4) | (0b01 << 6);
            w.bits(bits)
        });

        // Pull-ups on the columns.
        gpio.pupdr.modify(|r, w| unsafe {
            let mut bits = r.bits() & !(0xff << 8);
            bits |= (0b01 << 8) | (0b01 << 10) | (0b01 << 12) | (0b01 << 14);
            w.bits(bits)
        });

        // Rows idle low.
        gpio.bsrr.write(|w| unsafe { w.bits(0xf << 16) });

        // Route EXTI4..EXTI7 to port D.
        syscfg.exticr2.modify(|_, w| unsafe {
            w.exti4()
                .bits(0b0011)
                .exti5()
                .bits(0b0011)
                .exti6()
                .bits(0b0011)
                .exti7()
                .bits(0b0011)
        });

        // Falling edge on all four column lines, then unmask.
        exti.ftsr.modify(|r, w| unsafe { w.bits(r.bits() | COLUMN_LINES) });
        exti.pr.write(|w| unsafe { w.bits(COLUMN_LINES) });
        exti.imr.modify(|r, w| unsafe { w.bits(r.bits() | COLUMN_LINES) });

        Self { gpio, exti }
    }

    /// Mask the column-edge interrupt lines (scan re-entrancy guard).
    pub fn mask(&mut self) {
        self.exti
            .imr
            .modify(|r, w| unsafe { w.bits(r.bits() & !COLUMN_LINES) });
    }

    /// Unmask the column-edge interrupt lines.
    pub fn unmask(&mut self) {
        self.exti
            .imr
            .modify(|r, w| unsafe { w.bits(r.bits() | COLUMN_LINES) });
    }

    /// Clear any pending column edges (write-1-to-clear).
    pub fn clear_pending(&mut self) {
        self.exti.pr.write(|w| unsafe { w.bits(COLUMN_LINES) });
    }
}

impl KeypadBus for KeypadPort {
    fn drive_row(&mut self, row: u8) {
        self.gpio
            .bsrr
            .write(|w| unsafe { w.bits(1 << (row & 0x3)) });
    }

    fn release_row(&mut self, row: u8) {
        self.gpio
            .bsrr
            .write(|w| unsafe { w.bits(1 << ((row & 0x3) + 16)) });
    }

    fn read_columns(&self) -> u8 {
        ((self.gpio.idr.read().bits() >> 4) & 0xf) as u8
    }
}
