// Mock embedded-hal peripherals for host tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::i2c::{self, I2c};
use embedded_hal::spi::{self, SpiDevice};

use crate::drivers::audio::{PinFunction, PinMux};
use crate::drivers::tone::ToneOutput;

// ── I2C register file ───────────────────────────────────────────────

/// 256-byte register file behind a single device address. The first byte
/// of every write is the register pointer; reads continue from it.
pub struct MockI2c {
    pub address: u8,
    pub regs: [u8; 256],
    pub writes: Vec<(u8, u8)>,
    pointer: u8,
}

impl MockI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            regs: [0; 256],
            writes: Vec::new(),
            pointer: 0,
        }
    }

    pub fn set_word(&mut self, reg: u8, value: i16) {
        let [hi, lo] = value.to_be_bytes();
        self.regs[reg as usize] = hi;
        self.regs[reg as usize + 1] = lo;
    }
}

impl i2c::ErrorType for MockI2c {
    type Error = i2c::ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(i2c::ErrorKind::NoAcknowledge(
                i2c::NoAcknowledgeSource::Address,
            ));
        }
        for op in operations.iter_mut() {
            match op {
                i2c::Operation::Write(bytes) => {
                    let Some((&reg, values)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = reg;
                    for &v in values {
                        self.regs[self.pointer as usize] = v;
                        self.writes.push((self.pointer, v));
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
                i2c::Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.regs[self.pointer as usize];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

// ── SPI with linked D/C line ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wire {
    Command(Vec<u8>),
    Data(Vec<u8>),
}

#[derive(Default)]
pub struct Bus {
    pub dc_high: bool,
    pub log: Vec<Wire>,
    pub reset_levels: Vec<bool>,
}

pub type SharedBus = Rc<RefCell<Bus>>;

pub fn shared_bus() -> SharedBus {
    Rc::new(RefCell::new(Bus::default()))
}

pub struct MockSpi(pub SharedBus);

impl spi::ErrorType for MockSpi {
    type Error = Infallible;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [spi::Operation<'_, u8>]) -> Result<(), Infallible> {
        let mut bus = self.0.borrow_mut();
        for op in operations.iter() {
            if let spi::Operation::Write(bytes) = op {
                let entry = if bus.dc_high {
                    Wire::Data(bytes.to_vec())
                } else {
                    Wire::Command(bytes.to_vec())
                };
                bus.log.push(entry);
            }
        }
        Ok(())
    }
}

pub struct MockDc(pub SharedBus);

impl digital::ErrorType for MockDc {
    type Error = Infallible;
}

impl OutputPin for MockDc {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().dc_high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().dc_high = true;
        Ok(())
    }
}

pub struct MockRst(pub SharedBus);

impl digital::ErrorType for MockRst {
    type Error = Infallible;
}

impl OutputPin for MockRst {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().reset_levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().reset_levels.push(true);
        Ok(())
    }
}

/// Flattens the command stream (data bytes dropped).
pub fn commands(bus: &SharedBus) -> Vec<u8> {
    bus.borrow()
        .log
        .iter()
        .filter_map(|w| match w {
            Wire::Command(c) => Some(c.clone()),
            Wire::Data(_) => None,
        })
        .flatten()
        .collect()
}

// ── GPIO input ──────────────────────────────────────────────────────

/// Input pin whose level is shared with the test body.
#[derive(Clone)]
pub struct MockKey(pub Rc<RefCell<bool>>);

impl MockKey {
    /// Released (pulled up).
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(true)))
    }

    pub fn press(&self) {
        *self.0.borrow_mut() = false;
    }

    pub fn release(&self) {
        *self.0.borrow_mut() = true;
    }
}

impl digital::ErrorType for MockKey {
    type Error = Infallible;
}

impl InputPin for MockKey {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(*self.0.borrow())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!*self.0.borrow())
    }
}

// ── Delay / PWM / pin mux ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Start(u32, u8),
    Stop,
    Wait(u32),
}

pub type Timeline = Rc<RefCell<Vec<Step>>>;

pub struct MockDelay(pub Timeline);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(Step::Wait(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(Step::Wait(ms));
    }
}

pub struct MockPwm(pub Timeline);

impl ToneOutput for MockPwm {
    type Error = Infallible;

    fn start(&mut self, freq_hz: u32, duty_pct: u8) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Step::Start(freq_hz, duty_pct));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Step::Stop);
        Ok(())
    }
}

pub struct MockMux {
    pub function: Option<PinFunction>,
    pub broken: bool,
    pub kept: bool,
}

impl MockMux {
    pub fn new() -> Self {
        Self {
            function: None,
            broken: false,
            kept: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            function: None,
            broken: true,
            kept: false,
        }
    }
}

impl PinMux for MockMux {
    type Error = ();

    fn set_function(&mut self, function: PinFunction) -> Result<(), ()> {
        if self.broken {
            return Err(());
        }
        self.function = Some(function);
        Ok(())
    }

    fn keep_function_on_drop(&mut self) {
        self.kept = true;
    }
}
