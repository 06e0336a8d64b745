// SPDX-License-Identifier: MIT

//! Firmware entry and interrupt wiring for the treadmill controller.
//!
//! Three interrupt sources drive everything:
//!
//! - `EXTI4` / `EXTI9_5`: falling edge on a keypad column. Masks the keypad,
//!   snapshots the columns, arms the settle one-shot.
//! - `TIM6_DAC`: settle delay elapsed. Confirms the scan, echoes the key on
//!   the display, dispatches the command, re-arms the keypad.
//! - `TIM2`: heart-rate pulse captured. Updates the moving average.
//! - `TIM7`: telemetry period elapsed. Samples temperature, sends one frame.
//!
//! All shared state lives in critical-section `Mutex`es; every handler does
//! its work inside one `interrupt::free` block, so a capture or report
//! interrupt can preempt the settle window without ever observing a
//! half-updated state.

#![no_main]
#![no_std]

use core::cell::RefCell;

use cortex_m::interrupt::{self, Mutex};
use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    pac,
    pac::interrupt as isr,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use treadmill::control::telemetry::celsius_from_counts;
use treadmill::control::{handle_key, Actuation, ControlState, PulseAverager, SpeedDrive, TelemetryFrame};
use treadmill::hw::adc::Adc;
use treadmill::hw::display::SevenSeg;
use treadmill::hw::keypad_port::KeypadPort;
use treadmill::hw::pwm::BeltPwm;
use treadmill::hw::timers::{PulseCapture, ReportClock, SettleTimer};
use treadmill::hw::usart::Usart;
use treadmill::hw::{CaptureCounter, KeyDisplay, ReportTimer};
use treadmill::keypad::{Scan, ScanOutcome};
use treadmill::keypad::scanner::PendingScan;

/// ADC channel wired to the temperature sensor (PA3).
const TEMP_CHANNEL: u8 = 3;

/// Everything the interrupt handlers touch besides the pure state.
struct Board {
    keypad: KeypadPort,
    display: SevenSeg,
    drive: SpeedDrive<BeltPwm>,
    capture: PulseCapture,
    report: ReportClock,
    settle: SettleTimer,
    serial: Usart<pac::USART1>,
    adc: Adc,
}

impl Actuation for Board {
    fn apply_speed(&mut self, kmh: u8) {
        // Range is guaranteed by the interpreter.
        let _ = self.drive.set_speed(kmh);
    }

    fn power_up(&mut self) {
        self.drive.enable();
    }

    fn shutdown(&mut self) {
        self.drive.shutdown();
        self.capture.disable();
        self.report.disable();
    }

    fn start_tracking(&mut self) {
        self.capture.enable();
        self.report.enable();
    }
}

static STATE: Mutex<RefCell<ControlState>> = Mutex::new(RefCell::new(ControlState::new()));
static AVERAGER: Mutex<RefCell<PulseAverager>> = Mutex::new(RefCell::new(PulseAverager::new()));
static PENDING: Mutex<RefCell<Option<PendingScan>>> = Mutex::new(RefCell::new(None));
static BOARD: Mutex<RefCell<Option<Board>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    // GPIO
    let gpioa = dp.GPIOA.split();

    // USART1 (telemetry)
    let tx = gpioa.pa9.into_alternate::<7>();
    let rx = gpioa.pa10.into_alternate::<7>();
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (tx, rx), &clocks, usart_cfg);
    let serial = Usart::new(serial);

    // TIM2 CH1 capture input and TIM3 CH1 PWM output
    let _pulse_in = gpioa.pa0.into_alternate::<1>();
    let _pwm_out = gpioa.pa6.into_alternate::<2>();

    // Temperature sense on PA3
    let _temp_in = gpioa.pa3.into_analog();

    let board = Board {
        keypad: KeypadPort::new(dp.GPIOD, dp.EXTI, &dp.SYSCFG),
        display: SevenSeg::new(dp.GPIOE),
        drive: SpeedDrive::new(BeltPwm::new(dp.TIM3)),
        capture: PulseCapture::new(dp.TIM2),
        report: ReportClock::new(dp.TIM7),
        settle: SettleTimer::new(dp.TIM6),
        serial,
        adc: Adc::adc1(dp.ADC1),
    };

    interrupt::free(|cs| {
        BOARD.borrow(cs).replace(Some(board));
    });

    unsafe {
        pac::NVIC::unmask(pac::Interrupt::EXTI4);
        pac::NVIC::unmask(pac::Interrupt::EXTI9_5);
        pac::NVIC::unmask(pac::Interrupt::TIM6_DAC);
        pac::NVIC::unmask(pac::Interrupt::TIM2);
        pac::NVIC::unmask(pac::Interrupt::TIM7);
    }

    loop {
        cortex_m::asm::wfi();
    }
}

/// Column edge: snapshot and arm the settle timer.
///
/// The keypad lines stay masked until the settle handler finishes, so a
/// bouncing contact cannot re-enter the scan.
fn on_column_edge() {
    interrupt::free(|cs| {
        let mut board = BOARD.borrow(cs).borrow_mut();
        let Some(board) = board.as_mut() else { return };

        board.keypad.mask();
        board.keypad.clear_pending();
        PENDING
            .borrow(cs)
            .replace(Some(Scan::begin(&mut board.keypad)));
        board.settle.start();
    });
}

#[isr]
fn EXTI4() {
    on_column_edge();
}

#[isr]
fn EXTI9_5() {
    on_column_edge();
}

/// Settle delay elapsed: confirm, echo, dispatch, re-arm.
#[isr]
fn TIM6_DAC() {
    interrupt::free(|cs| {
        let mut board = BOARD.borrow(cs).borrow_mut();
        let Some(board) = board.as_mut() else { return };

        board.settle.clear_update_flag();

        if let Some(pending) = PENDING.borrow(cs).take() {
            if let ScanOutcome::Key(ev) = pending.confirm(&mut board.keypad) {
                // Echo the raw key whether or not it changes anything.
                board.display.show(ev.segments);

                let mut state = STATE.borrow(cs).borrow_mut();
                let _ = handle_key(&mut state, ev.key, &mut *board);
            }
        }

        // Single re-arm on every path: bounce and no-key included.
        board.keypad.clear_pending();
        board.keypad.unmask();
    });
}

/// Pulse edge captured: fold the period into the rate estimate.
#[isr]
fn TIM2() {
    interrupt::free(|cs| {
        let mut board = BOARD.borrow(cs).borrow_mut();
        let Some(board) = board.as_mut() else { return };

        board.capture.clear_capture_flag();
        let now = board.capture.counter();
        if let Some(ppm) = AVERAGER.borrow(cs).borrow_mut().on_capture(now) {
            STATE.borrow(cs).borrow_mut().rate_ppm = ppm;
        }
    });
}

/// Telemetry period elapsed: snapshot, sample, transmit.
#[isr]
fn TIM7() {
    interrupt::free(|cs| {
        let mut board = BOARD.borrow(cs).borrow_mut();
        let Some(board) = board.as_mut() else { return };

        board.report.clear_update_flag();

        let state = *STATE.borrow(cs).borrow();
        let frame = TelemetryFrame {
            rate_ppm: state.rate_ppm,
            speed_kmh: state.speed_kmh,
            temp_dc: Some(celsius_from_counts(board.adc.read(TEMP_CHANNEL))),
        };
        frame.send(&mut board.serial);
    });
}
