//! FT6236 Touchscreen Controller
//!
//! Drives the FocalTech FT6236 family (FT6206, FT6236, FT6236U) over I²C:
//! hardware reset, threshold and point rate setup, vendor identification,
//! and decoding of the touch status block into a [`TouchReport`].

#![cfg_attr(not(test), no_std)]

use core::fmt;

use embedded_hal::{delay::DelayNs, digital::OutputPin, i2c::I2c};

mod irq;
mod report;
#[cfg(test)]
mod testing;

pub use irq::InterruptFlag;
pub use report::{StatusBlock, TouchPoint, TouchReport, STATUS_BLOCK_LEN, STATUS_BLOCK_MIN_LEN};

// 7-bit I²C address (0x70 / 0x71 in 8-bit notation)
pub const DEFAULT_I2C_ADDR: u8 = 0x38;

const FT6236_REG_DATA: u8 = 0x00;
const FT6236_REG_THRESHOLD: u8 = 0x80;
const FT6236_REG_POINT_RATE: u8 = 0x88;
const FT6236_REG_CHIP_ID: u8 = 0xA3;
const FT6236_REG_FIRMWARE_VERSION: u8 = 0xA6;
const FT6236_REG_VENDOR_ID: u8 = 0xA8;

/// FocalTech panel vendor ID
pub const FT6236_VENDOR_ID: u8 = 0x11;

const FT6206_CHIP_ID: u8 = 0x06;
const FT6236_CHIP_ID: u8 = 0x36;
const FT6236U_CHIP_ID: u8 = 0x64;

pub const DEFAULT_THRESHOLD: u8 = 128;
pub const MAX_POINT_RATE: u8 = 0xFF;

// Reset line held low, settle after release, settle after configuration
const RESET_HOLD_MS: u32 = 100;
const RESET_RELEASE_MS: u32 = 10;
const CONFIG_SETTLE_MS: u32 = 100;

/// Error type for the FT6236 driver
#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// Bus transaction failed or timed out.
    I2c(E),
    /// The vendor ID register did not hold [`FT6236_VENDOR_ID`].
    InvalidVendorId(u8),
    Pin,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Error::InvalidVendorId(id) => write!(f, "Invalid vendor ID: {:#04x}", id),
            Error::Pin => write!(f, "Pin error"),
        }
    }
}

/// Chip variant as reported by the chip ID register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipModel {
    FT6206,
    FT6236,
    FT6236U,
    Unknown(u8),
}

impl From<u8> for ChipModel {
    fn from(id: u8) -> Self {
        match id {
            FT6206_CHIP_ID => ChipModel::FT6206,
            FT6236_CHIP_ID => ChipModel::FT6236,
            FT6236U_CHIP_ID => ChipModel::FT6236U,
            other => ChipModel::Unknown(other),
        }
    }
}

/// Identification and configuration read back from the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipInfo {
    pub vendor_id: u8,
    pub chip_id: u8,
    pub firmware_version: u8,
    pub point_rate: u8,
    pub threshold: u8,
}

impl ChipInfo {
    pub fn model(&self) -> ChipModel {
        ChipModel::from(self.chip_id)
    }
}

/// FT6236 Options
#[derive(Debug, Clone, Copy)]
pub struct FT6236Options {
    /// 7-bit I²C address of the chip.
    pub address: u8,
    /// Touch detection threshold.
    pub threshold: u8,
    /// Report rate, 0xFF selects the maximum.
    pub point_rate: u8,
    /// Read back and log chip information after initialization.
    pub diagnostics: bool,
}

impl Default for FT6236Options {
    fn default() -> Self {
        Self {
            address: DEFAULT_I2C_ADDR,
            threshold: DEFAULT_THRESHOLD,
            point_rate: MAX_POINT_RATE,
            diagnostics: true,
        }
    }
}

/// FT6236 Builder
pub struct FT6236Builder<I2C, RESET, DELAY> {
    /// Underlying I²C peripheral
    i2c: I2C,
    /// Reset pin
    reset: RESET,
    /// Delay provider
    delay: DELAY,
    /// Options
    options: FT6236Options,
}

impl<I2C, RESET, DELAY> FT6236Builder<I2C, RESET, DELAY>
where
    I2C: I2c,
    RESET: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new FT6236Builder instance.
    pub fn new(i2c: I2C, reset: RESET, delay: DELAY) -> Self {
        Self {
            i2c,
            reset,
            delay,
            options: FT6236Options::default(),
        }
    }

    /// Sets the I²C address if the panel is strapped differently
    pub fn address(mut self, address: u8) -> Self {
        self.options.address = address;
        self
    }

    /// Sets the touch detection threshold
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.options.threshold = threshold;
        self
    }

    /// Sets the point rate
    pub fn point_rate(mut self, point_rate: u8) -> Self {
        self.options.point_rate = point_rate;
        self
    }

    /// Enables or disables the post-initialization chip readback
    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.options.diagnostics = enabled;
        self
    }

    /// Builds the driver. Nothing is sent to the chip until
    /// [`FT6236::initialize`] is called.
    pub fn build(self) -> FT6236<I2C, RESET, DELAY> {
        FT6236::new(self.i2c, self.reset, self.delay, self.options)
    }
}

/// FT6236 driver
pub struct FT6236<I2C, RESET, DELAY> {
    /// Underlying I²C peripheral
    i2c: I2C,
    /// Reset pin
    reset: RESET,
    /// Delay provider
    delay: DELAY,
    options: FT6236Options,
    report: TouchReport,
    info: Option<ChipInfo>,
}

pub trait TouchController {
    type Error;

    fn read_frame(&mut self) -> Result<&TouchReport, Self::Error>;
}

impl<I2C, RESET, DELAY> TouchController for FT6236<I2C, RESET, DELAY>
where
    I2C: I2c,
    RESET: OutputPin,
    DELAY: DelayNs,
{
    type Error = Error<I2C::Error>;

    fn read_frame(&mut self) -> Result<&TouchReport, Self::Error> {
        FT6236::read_frame(self)
    }
}

impl<I2C, RESET, DELAY> FT6236<I2C, RESET, DELAY>
where
    I2C: I2c,
    RESET: OutputPin,
    DELAY: DelayNs,
{
    fn new(i2c: I2C, reset: RESET, delay: DELAY, options: FT6236Options) -> Self {
        Self {
            i2c,
            reset,
            delay,
            options,
            report: TouchReport::new(),
            info: None,
        }
    }

    /// Reset the chip, write threshold and point rate, then check the
    /// vendor ID.
    ///
    /// With diagnostics enabled the chip information is read back and logged
    /// afterwards; a failure there is only logged.
    pub fn initialize(&mut self) -> Result<(), Error<I2C::Error>> {
        self.info = None;
        self.reset()?;

        self.write_register(FT6236_REG_THRESHOLD, self.options.threshold)?;
        self.write_register(FT6236_REG_POINT_RATE, self.options.point_rate)?;
        self.delay.delay_ms(CONFIG_SETTLE_MS);

        let vendor_id = self.read_register(FT6236_REG_VENDOR_ID)?;
        if vendor_id != FT6236_VENDOR_ID {
            log::warn!(
                "Unexpected vendor ID {:#04x}, expected {:#04x}",
                vendor_id,
                FT6236_VENDOR_ID
            );
            return Err(Error::InvalidVendorId(vendor_id));
        }

        if self.options.diagnostics {
            match self.read_chip_info() {
                Ok(info) => {
                    log::info!("Touch vendor ID: {:#04x}", info.vendor_id);
                    log::info!("Touch chip ID: {:#04x} ({:?})", info.chip_id, info.model());
                    log::info!("Touch firmware version: {}", info.firmware_version);
                    log::info!("Touch point rate: {}", info.point_rate);
                    log::info!("Touch threshold: {}", info.threshold);
                    self.info = Some(info);
                }
                Err(e) => log::warn!("Touch diagnostics unavailable: {:?}", e),
            }
        }

        Ok(())
    }

    /// Perform a hardware reset
    fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        self.reset.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(RESET_HOLD_MS);

        self.reset.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(RESET_RELEASE_MS);

        Ok(())
    }

    /// Read identification and configuration registers
    pub fn read_chip_info(&mut self) -> Result<ChipInfo, Error<I2C::Error>> {
        Ok(ChipInfo {
            vendor_id: self.read_register(FT6236_REG_VENDOR_ID)?,
            chip_id: self.read_register(FT6236_REG_CHIP_ID)?,
            firmware_version: self.read_register(FT6236_REG_FIRMWARE_VERSION)?,
            point_rate: self.read_register(FT6236_REG_POINT_RATE)?,
            threshold: self.read_register(FT6236_REG_THRESHOLD)?,
        })
    }

    /// Chip information cached by the last successful [`Self::initialize`]
    pub fn chip_info(&self) -> Option<&ChipInfo> {
        self.info.as_ref()
    }

    /// Read the status block and decode it into the touch report.
    ///
    /// On a bus error the report is left exactly as it was.
    pub fn read_frame(&mut self) -> Result<&TouchReport, Error<I2C::Error>> {
        let mut raw = [0u8; STATUS_BLOCK_LEN];
        self.read_block(FT6236_REG_DATA, &mut raw)?;
        log::trace!("Touch status block: {:02x?}", raw);

        self.report.decode(&StatusBlock::new(raw));
        Ok(&self.report)
    }

    /// Read a frame if `irq` was raised. Returns whether a frame was read.
    ///
    /// When the read fails the flag is raised again so the next poll retries.
    pub fn poll(&mut self, irq: &InterruptFlag) -> Result<bool, Error<I2C::Error>> {
        if !irq.take() {
            return Ok(false);
        }

        self.report.interrupt_pending = true;
        if let Err(e) = self.read_frame() {
            irq.raise();
            return Err(e);
        }
        Ok(true)
    }

    /// Flag the report as needing a fresh frame
    pub fn mark_pending(&mut self) {
        self.report.interrupt_pending = true;
    }

    /// Latest decoded touch state
    pub fn report(&self) -> &TouchReport {
        &self.report
    }

    /// Release the underlying peripherals
    pub fn release(self) -> (I2C, RESET, DELAY) {
        (self.i2c, self.reset, self.delay)
    }

    /// Write a single register
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write(self.options.address, &[reg, value])
            .map_err(|e| {
                log::error!("I2C write failed for register {:#04x}: {:?}", reg, e);
                Error::I2c(e)
            })
    }

    /// Read a single register
    fn read_register(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.read_block(reg, &mut buf)?;
        Ok(buf[0])
    }

    /// Read consecutive registers starting at `reg`
    fn read_block(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write_read(self.options.address, &[reg], buf)
            .map_err(|e| {
                log::error!("I2C write-read failed for register {:#04x}: {:?}", reg, e);
                Error::I2c(e)
            })
    }
}
