//! Basic ADC1 support using direct PAC register access, for the auxiliary
//! temperature channel. Blocking single-channel reads only.

use stm32f7xx_hal::pac;

/// ADC1 wrapper with blocking software-triggered conversions.
pub struct Adc {
    adc: pac::ADC1,
}

impl Adc {
    /// Create and initialize ADC1.
    pub fn adc1(adc1: pac::ADC1) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        let common = unsafe { &*pac::ADC_COMMON::ptr() };

        // ADC prescaler: PCLK2 / 4
        common.ccr.modify(|_, w| w.adcpre().div4());

        // Power off to configure
        adc1.cr2.modify(|_, w| w.adon().clear_bit());

        // 12-bit, right-aligned, software trigger
        adc1.cr1.modify(|_, w| w.res().bits(0b00));
        adc1.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().right();
            w.exten().disabled();
            w
        });

        // Default minimal sample times
        adc1.smpr2.modify(|_, w| unsafe { w.bits(0) });

        // Power on
        adc1.cr2.modify(|_, w| w.adon().set_bit());

        Self { adc: adc1 }
    }

    /// Read a single channel (0..=9), blocking until conversion completes.
    pub fn read(&self, channel: u8) -> u16 {
        // Long sample time for channel stability
        if channel <= 9 {
            self.adc.smpr2.modify(|_, w| match channel {
                0 => w.smp0().bits(0b111),
                1 => w.smp1().bits(0b111),
                2 => w.smp2().bits(0b111),
                3 => w.smp3().bits(0b111),
                4 => w.smp4().bits(0b111),
                5 => w.smp5().bits(0b111),
                6 => w.smp6().bits(0b111),
                7 => w.smp7().bits(0b111),
                8 => w.smp8().bits(0b111),
                9 => w.smp9().bits(0b111),
                _ => unreachable!(),
            });
        }

        // Sequence length = 1 conversion
        self.adc.sqr1.modify(|_, w| w.l().bits(0));

        // Set channel
        self.adc
            .sqr3
            .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1f) });

        // Start
        self.adc.cr2.modify(|_, w| w.swstart().set_bit());

        // Wait for completion
        while self.adc.sr.read().eoc().bit_is_clear() {}

        self.adc.dr.read().data().bits()
    }
}
