//! Host-side doubles for the embedded-hal traits used by the driver.

use std::{cell::RefCell, rc::Rc};

use embedded_hal::{
    delay::DelayNs,
    digital::{self, OutputPin},
    i2c::{self, ErrorKind, I2c, Operation, SevenBitAddress},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ResetLow,
    ResetHigh,
    DelayMs(u32),
    Write { addr: u8, reg: u8, data: Vec<u8> },
    Read { addr: u8, reg: u8, len: usize },
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusError;

impl i2c::Error for BusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinError;

impl digital::Error for PinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Simulated register file behind a single I2C address.
pub struct MockBus {
    pub log: EventLog,
    pub regs: [u8; 256],
    pub address: u8,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Fail only reads of this register.
    pub fail_reg: Option<u8>,
    pointer: u8,
}

impl MockBus {
    pub fn new(log: EventLog, address: u8) -> Self {
        Self {
            log,
            regs: [0; 256],
            address,
            fail_reads: false,
            fail_writes: false,
            fail_reg: None,
            pointer: 0,
        }
    }

    pub fn load(&mut self, start: u8, data: &[u8]) {
        let start = start as usize;
        self.regs[start..start + data.len()].copy_from_slice(data);
    }
}

impl i2c::ErrorType for MockBus {
    type Error = BusError;
}

impl I2c for MockBus {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(BusError);
        }

        for op in operations {
            match op {
                Operation::Write(data) => {
                    let Some((&reg, payload)) = data.split_first() else {
                        continue;
                    };
                    self.pointer = reg;
                    if payload.is_empty() {
                        continue;
                    }
                    self.log.borrow_mut().push(Event::Write {
                        addr: address,
                        reg,
                        data: payload.to_vec(),
                    });
                    if self.fail_writes {
                        return Err(BusError);
                    }
                    for (i, b) in payload.iter().enumerate() {
                        self.regs[(reg as usize + i) & 0xFF] = *b;
                    }
                }
                Operation::Read(buf) => {
                    let reg = self.pointer;
                    self.log.borrow_mut().push(Event::Read {
                        addr: address,
                        reg,
                        len: buf.len(),
                    });
                    if self.fail_reads || self.fail_reg == Some(reg) {
                        return Err(BusError);
                    }
                    for (i, b) in buf.iter_mut().enumerate() {
                        *b = self.regs[(reg as usize + i) & 0xFF];
                    }
                }
            }
        }

        Ok(())
    }
}

pub struct MockPin {
    pub log: EventLog,
    pub fail: bool,
}

impl digital::ErrorType for MockPin {
    type Error = PinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(PinError);
        }
        self.log.borrow_mut().push(Event::ResetLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(PinError);
        }
        self.log.borrow_mut().push(Event::ResetHigh);
        Ok(())
    }
}

pub struct MockDelay {
    pub log: EventLog,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ms));
    }
}

pub fn parts(address: u8) -> (MockBus, MockPin, MockDelay, EventLog) {
    let log = EventLog::default();
    (
        MockBus::new(log.clone(), address),
        MockPin {
            log: log.clone(),
            fail: false,
        },
        MockDelay { log: log.clone() },
        log,
    )
}
