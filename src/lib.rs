//! Driver for the INA226 current, voltage and power monitor.
//!
//! The handle does not own the bus: every transaction borrows the I2C
//! peripheral, so one bus can be shared with other devices. A handle itself
//! is single-owner; share it behind a mutex if several contexts poll it.
//!
//! ```no_run
//! use ina226_monitor::{Configuration, Ina226};
//! # #[cfg(not(feature = "async"))]
//! # fn example<I: embedded_hal::i2c::I2c>(mut i2c: I) -> Result<(), ina226_monitor::Error<I::Error>> {
//! let mut ina = Ina226::new().begin(&mut i2c, 1000, Configuration::DEFAULT)?;
//! ina.sample(&mut i2c)?;
//! let bus_mv = ina.bus_voltage();
//! let current_ma = ina.current_f32();
//! # Ok(())
//! # }
//! ```
//!
//! With the `async` feature the same API is built on `embedded-hal-async`.

#![no_std]

#[cfg(test)]
extern crate std;

mod calibration;
mod config;
mod error;
mod registers;

use byteorder::{BigEndian, ByteOrder};
use core::marker::PhantomData;

#[cfg(not(feature = "async"))]
use embedded_hal::{delay::DelayNs, i2c::I2c};
#[cfg(feature = "async")]
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

pub use calibration::{
    Calibration, BUS_VOLTAGE_LSB_MV, CALIBRATION_CONSTANT, CURRENT_FULL_SCALE,
    DEFAULT_MAX_CURRENT_MA, DEFAULT_SHUNT_OHMS, POWER_LSB_RATIO, SHUNT_VOLTAGE_LSB_MV,
};
pub use config::{Averaging, Configuration, ConversionTime, Mode};
pub use error::Error;
pub use registers::{address_from_pins, Pin, Register, DEFAULT_ADDRESS, DIE_ID, MANUFACTURER_ID};

/// Delay between two conversion-ready polls.
pub const POLL_INTERVAL_US: u32 = 500;

const UNCALIBRATED: Calibration = Calibration {
    word: 0,
    current_lsb_ma: 0.0,
    power_lsb_mw: 0.0,
};

/// Handle state before `begin` has written the calibration.
#[derive(Debug, Clone, Copy)]
pub struct Unconfigured;
/// Handle state once the device is configured and calibrated.
#[derive(Debug, Clone, Copy)]
pub struct Configured;

/// Latched register contents from one [`Ina226::sample`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawMeasurements {
    pub shunt: i16,
    pub bus: i16,
    pub power: i16,
    pub current: i16,
}

/// Physical values converted from a [`RawMeasurements`] set.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurements {
    pub shunt_voltage_mv: f32,
    pub bus_voltage_mv: f32,
    pub current_ma: f32,
    pub power_mw: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Ina226<State = Unconfigured> {
    address: u8,
    shunt_ohms: f32,
    configuration: Configuration,
    calibration: Calibration,
    raw: RawMeasurements,
    state: PhantomData<State>,
}

impl Default for Ina226 {
    fn default() -> Self {
        Self::new()
    }
}

impl Ina226 {
    pub fn new() -> Self {
        Self::with_address(DEFAULT_ADDRESS)
    }

    pub fn with_address(address: u8) -> Self {
        Ina226 {
            address,
            shunt_ohms: DEFAULT_SHUNT_OHMS,
            configuration: Configuration::DEFAULT,
            calibration: UNCALIBRATED,
            raw: RawMeasurements::default(),
            state: PhantomData,
        }
    }

    /// Address selected by the A0/A1 strapping.
    pub fn with_pins(a0: Pin, a1: Pin) -> Self {
        Self::with_address(address_from_pins(a0, a1))
    }

    /// Overrides the 0.1 Ohm default shunt. Checked by `begin`.
    pub fn with_shunt_resistor(mut self, ohms: f32) -> Self {
        self.shunt_ohms = ohms;
        self
    }
}

impl<State> Ina226<State> {
    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn shunt_resistor(&self) -> f32 {
        self.shunt_ohms
    }

    fn into_state<Next>(self) -> Ina226<Next> {
        Ina226 {
            address: self.address,
            shunt_ohms: self.shunt_ohms,
            configuration: self.configuration,
            calibration: self.calibration,
            raw: self.raw,
            state: PhantomData,
        }
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), keep_self),
    async(feature = "async", keep_self)
)]
impl<State> Ina226<State> {
    /// Reads a 16-bit register: pointer write, repeated start, two-byte read.
    ///
    /// The bytes arrive MSB first and are returned as a two's-complement
    /// value. The transport either fills both bytes or reports an error;
    /// bus timeouts raised by the HAL surface as [`Error::I2c`].
    pub async fn read_register<I2C>(
        &self,
        i2c: &mut I2C,
        register: Register,
    ) -> Result<i16, Error<I2C::Error>>
    where
        I2C: I2c,
    {
        let mut rx_buffer: [u8; 2] = [0; 2];
        i2c.write_read(self.address, &[register.addr()], &mut rx_buffer)
            .await
            .map_err(Error::I2c)?;
        Ok(BigEndian::read_i16(&rx_buffer))
    }

    /// Writes a 16-bit register MSB first in a single transaction.
    pub async fn write_register<I2C>(
        &self,
        i2c: &mut I2C,
        register: Register,
        value: u16,
    ) -> Result<(), Error<I2C::Error>>
    where
        I2C: I2c,
    {
        let mut tx_buffer: [u8; 3] = [register.addr(), 0, 0];
        BigEndian::write_u16(&mut tx_buffer[1..], value);
        i2c.write(self.address, &tx_buffer)
            .await
            .map_err(Error::I2c)
    }

    pub async fn manufacturer_id<I2C>(&self, i2c: &mut I2C) -> Result<u16, Error<I2C::Error>>
    where
        I2C: I2c,
    {
        Ok(self.read_register(i2c, Register::ManufacturerId).await? as u16)
    }

    pub async fn die_id<I2C>(&self, i2c: &mut I2C) -> Result<u16, Error<I2C::Error>>
    where
        I2C: I2c,
    {
        Ok(self.read_register(i2c, Register::DieId).await? as u16)
    }

    /// Checks that an INA226 answers on the configured address.
    pub async fn verify<I2C>(&self, i2c: &mut I2C) -> Result<(), Error<I2C::Error>>
    where
        I2C: I2c,
    {
        let manufacturer = self.manufacturer_id(i2c).await?;
        if manufacturer != MANUFACTURER_ID {
            log::warn!(
                "ina226@{:#04x}: manufacturer id {:#06x}",
                self.address,
                manufacturer
            );
            return Err(Error::InvalidManufacturer);
        }

        let die = self.die_id(i2c).await?;
        if die != DIE_ID {
            log::warn!("ina226@{:#04x}: die id {:#06x}", self.address, die);
            return Err(Error::InvalidDie);
        }
        Ok(())
    }

    pub async fn read_configuration<I2C>(
        &self,
        i2c: &mut I2C,
    ) -> Result<Configuration, Error<I2C::Error>>
    where
        I2C: I2c,
    {
        let bits = self.read_register(i2c, Register::Configuration).await? as u16;
        Ok(Configuration::from_bits(bits))
    }

    pub async fn read_calibration<I2C>(&self, i2c: &mut I2C) -> Result<u16, Error<I2C::Error>>
    where
        I2C: I2c,
    {
        Ok(self.read_register(i2c, Register::Calibration).await? as u16)
    }

    /// Polls the conversion ready flag every [`POLL_INTERVAL_US`], at most
    /// `attempts` times.
    ///
    /// Reading the Mask/Enable register clears the flag, so a successful
    /// return consumes it.
    pub async fn wait_conversion_ready<I2C, D>(
        &self,
        i2c: &mut I2C,
        delay: &mut D,
        attempts: u32,
    ) -> Result<(), Error<I2C::Error>>
    where
        I2C: I2c,
        D: DelayNs,
    {
        for _ in 0..attempts {
            let flags = self.read_register(i2c, Register::MaskEnable).await? as u16;
            if flags & registers::CONVERSION_READY_FLAG != 0 {
                return Ok(());
            }
            delay.delay_us(POLL_INTERVAL_US).await;
        }
        Err(Error::Timeout)
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), keep_self),
    async(feature = "async", keep_self)
)]
impl Ina226<Unconfigured> {
    /// Writes `configuration` verbatim, then the calibration derived from
    /// `max_current_ma` and the shunt resistor.
    ///
    /// Inputs are validated before any bus traffic; an invalid full-scale
    /// current or shunt fails with [`Error::Configuration`].
    pub async fn begin<I2C>(
        self,
        i2c: &mut I2C,
        max_current_ma: i32,
        configuration: Configuration,
    ) -> Result<Ina226<Configured>, Error<I2C::Error>>
    where
        I2C: I2c,
    {
        let calibration = Calibration::derive(max_current_ma, self.shunt_ohms)
            .ok_or(Error::Configuration)?;

        self.write_register(i2c, Register::Configuration, configuration.bits())
            .await?;
        log::debug!(
            "ina226@{:#04x}: configuration {:#06x}, current LSB {} mA, calibration {}",
            self.address,
            configuration.bits(),
            calibration.current_lsb_ma,
            calibration.word
        );
        self.write_register(i2c, Register::Calibration, calibration.word)
            .await?;

        let mut ina = self.into_state::<Configured>();
        ina.configuration = configuration;
        ina.calibration = calibration;
        Ok(ina)
    }

    /// `begin` with 1000 mA full scale and the default configuration word.
    pub async fn begin_default<I2C>(
        self,
        i2c: &mut I2C,
    ) -> Result<Ina226<Configured>, Error<I2C::Error>>
    where
        I2C: I2c,
    {
        self.begin(i2c, DEFAULT_MAX_CURRENT_MA, Configuration::DEFAULT)
            .await
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), keep_self),
    async(feature = "async", keep_self)
)]
impl Ina226<Configured> {
    /// Latches shunt voltage, bus voltage, power and current, in that order.
    ///
    /// The stored set is replaced only when all four reads succeed.
    pub async fn sample<I2C>(&mut self, i2c: &mut I2C) -> Result<RawMeasurements, Error<I2C::Error>>
    where
        I2C: I2c,
    {
        let shunt = self.read_register(i2c, Register::ShuntVoltage).await?;
        let bus = self.read_register(i2c, Register::BusVoltage).await?;
        let power = self.read_register(i2c, Register::Power).await?;
        let current = self.read_register(i2c, Register::Current).await?;

        self.raw = RawMeasurements {
            shunt,
            bus,
            power,
            current,
        };
        log::trace!(
            "ina226@{:#04x}: raw shunt {} bus {} power {} current {}",
            self.address,
            shunt,
            bus,
            power,
            current
        );
        Ok(self.raw)
    }

    /// Runs `begin` again with new parameters. Latched samples are kept.
    pub async fn reconfigure<I2C>(
        self,
        i2c: &mut I2C,
        max_current_ma: i32,
        configuration: Configuration,
    ) -> Result<Ina226<Configured>, Error<I2C::Error>>
    where
        I2C: I2c,
    {
        let raw = self.raw;
        let mut ina = self
            .into_state::<Unconfigured>()
            .begin(i2c, max_current_ma, configuration)
            .await?;
        ina.raw = raw;
        Ok(ina)
    }

    /// Sets the reset bit; every register returns to its power-on value.
    pub async fn reset<I2C>(self, i2c: &mut I2C) -> Result<Ina226<Unconfigured>, Error<I2C::Error>>
    where
        I2C: I2c,
    {
        self.write_register(i2c, Register::Configuration, Configuration::RESET.bits())
            .await?;

        let mut ina = self.into_state::<Unconfigured>();
        ina.configuration = Configuration::DEFAULT;
        ina.calibration = UNCALIBRATED;
        ina.raw = RawMeasurements::default();
        Ok(ina)
    }

    /// Starts a single-shot conversion when a triggered mode is configured.
    pub async fn trigger<I2C>(&self, i2c: &mut I2C) -> Result<(), Error<I2C::Error>>
    where
        I2C: I2c,
    {
        self.write_register(i2c, Register::Configuration, self.configuration.bits())
            .await
    }
}

impl Ina226<Configured> {
    pub fn configuration(&self) -> Configuration {
        self.configuration
    }

    /// Calibration word written by `begin`.
    pub fn calibration(&self) -> u16 {
        self.calibration.word
    }

    /// Milliamps per current register LSB.
    pub fn current_lsb(&self) -> f32 {
        self.calibration.current_lsb_ma
    }

    /// Milliwatts per power register LSB.
    pub fn power_lsb(&self) -> f32 {
        self.calibration.power_lsb_mw
    }

    pub fn raw(&self) -> RawMeasurements {
        self.raw
    }

    /// Shunt voltage in millivolts.
    pub fn shunt_voltage_f32(&self) -> f32 {
        calibration::shunt_voltage_mv(self.raw.shunt)
    }

    /// Shunt voltage in millivolts, truncated toward zero.
    pub fn shunt_voltage(&self) -> i32 {
        calibration::truncate(self.shunt_voltage_f32())
    }

    /// Bus voltage in millivolts.
    pub fn bus_voltage_f32(&self) -> f32 {
        calibration::bus_voltage_mv(self.raw.bus)
    }

    /// Bus voltage in millivolts, truncated toward zero.
    pub fn bus_voltage(&self) -> i32 {
        calibration::truncate(self.bus_voltage_f32())
    }

    /// Current in milliamps.
    pub fn current_f32(&self) -> f32 {
        calibration::scale(self.raw.current, self.calibration.current_lsb_ma)
    }

    /// Current in milliamps, truncated toward zero.
    pub fn current(&self) -> i32 {
        calibration::truncate(self.current_f32())
    }

    /// Power in milliwatts.
    pub fn power_f32(&self) -> f32 {
        calibration::scale(self.raw.power, self.calibration.power_lsb_mw)
    }

    /// Power in milliwatts, truncated toward zero.
    pub fn power(&self) -> i32 {
        calibration::truncate(self.power_f32())
    }

    pub fn measurements(&self) -> Measurements {
        Measurements {
            shunt_voltage_mv: self.shunt_voltage_f32(),
            bus_voltage_mv: self.bus_voltage_f32(),
            current_ma: self.current_f32(),
            power_mw: self.power_f32(),
        }
    }
}
