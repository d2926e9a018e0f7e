//! Configuration register (`0x00`) word.
//!
//! Layout: reset `[15]`, averaging `[11:9]`, bus voltage conversion time
//! `[8:6]`, shunt voltage conversion time `[5:3]`, operating mode `[2:0]`.

const RESET_BIT: u16 = 1 << 15;
const AVERAGING_SHIFT: u16 = 9;
const BUS_CT_SHIFT: u16 = 6;
const SHUNT_CT_SHIFT: u16 = 3;
const FIELD_MASK: u16 = 0x07;

/// Number of samples averaged per reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Averaging {
    _1 = 0x00,
    _4 = 0x01,
    _16 = 0x02,
    _64 = 0x03,
    _128 = 0x04,
    _256 = 0x05,
    _512 = 0x06,
    _1024 = 0x07,
}

impl Averaging {
    fn from_field(field: u16) -> Self {
        match field & FIELD_MASK {
            0x00 => Averaging::_1,
            0x01 => Averaging::_4,
            0x02 => Averaging::_16,
            0x03 => Averaging::_64,
            0x04 => Averaging::_128,
            0x05 => Averaging::_256,
            0x06 => Averaging::_512,
            _ => Averaging::_1024,
        }
    }

    pub const fn samples(self) -> u16 {
        match self {
            Averaging::_1 => 1,
            Averaging::_4 => 4,
            Averaging::_16 => 16,
            Averaging::_64 => 64,
            Averaging::_128 => 128,
            Averaging::_256 => 256,
            Averaging::_512 => 512,
            Averaging::_1024 => 1024,
        }
    }
}

/// ADC conversion time, shared by the bus and shunt voltage fields.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionTime {
    _140_us = 0x00,
    _204_us = 0x01,
    _332_us = 0x02,
    _588_us = 0x03,
    _1_1_ms = 0x04,
    _2_116_ms = 0x05,
    _4_156_ms = 0x06,
    _8_244_ms = 0x07,
}

impl ConversionTime {
    fn from_field(field: u16) -> Self {
        match field & FIELD_MASK {
            0x00 => ConversionTime::_140_us,
            0x01 => ConversionTime::_204_us,
            0x02 => ConversionTime::_332_us,
            0x03 => ConversionTime::_588_us,
            0x04 => ConversionTime::_1_1_ms,
            0x05 => ConversionTime::_2_116_ms,
            0x06 => ConversionTime::_4_156_ms,
            _ => ConversionTime::_8_244_ms,
        }
    }

    pub const fn micros(self) -> u32 {
        match self {
            ConversionTime::_140_us => 140,
            ConversionTime::_204_us => 204,
            ConversionTime::_332_us => 332,
            ConversionTime::_588_us => 588,
            ConversionTime::_1_1_ms => 1100,
            ConversionTime::_2_116_ms => 2116,
            ConversionTime::_4_156_ms => 4156,
            ConversionTime::_8_244_ms => 8244,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    PowerDown = 0x00,
    ShuntVoltageTriggered = 0x01,
    BusVoltageTriggered = 0x02,
    ShuntAndBusTriggered = 0x03,
    PowerDown2 = 0x04,
    ShuntVoltageContinuous = 0x05,
    BusVoltageContinuous = 0x06,
    ShuntAndBusContinuous = 0x07,
}

impl Mode {
    fn from_field(field: u16) -> Self {
        match field & FIELD_MASK {
            0x00 => Mode::PowerDown,
            0x01 => Mode::ShuntVoltageTriggered,
            0x02 => Mode::BusVoltageTriggered,
            0x03 => Mode::ShuntAndBusTriggered,
            0x04 => Mode::PowerDown2,
            0x05 => Mode::ShuntVoltageContinuous,
            0x06 => Mode::BusVoltageContinuous,
            _ => Mode::ShuntAndBusContinuous,
        }
    }

    /// Single-shot modes: a conversion starts on every configuration write.
    pub const fn is_triggered(self) -> bool {
        matches!(
            self,
            Mode::ShuntVoltageTriggered | Mode::BusVoltageTriggered | Mode::ShuntAndBusTriggered
        )
    }
}

/// Configuration word, written verbatim by [`Ina226::begin`](crate::Ina226::begin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration(u16);

impl Default for Configuration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u16> for Configuration {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

impl From<Configuration> for u16 {
    fn from(config: Configuration) -> Self {
        config.0
    }
}

impl Configuration {
    /// 1 sample, 1.1 ms bus and shunt conversion, continuous shunt and bus.
    pub const DEFAULT: Configuration = Configuration(
        (Averaging::_1 as u16) << AVERAGING_SHIFT
            | (ConversionTime::_1_1_ms as u16) << BUS_CT_SHIFT
            | (ConversionTime::_1_1_ms as u16) << SHUNT_CT_SHIFT
            | Mode::ShuntAndBusContinuous as u16,
    );

    /// Word with only the reset bit set.
    pub const RESET: Configuration = Configuration(RESET_BIT);

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    fn with_field(self, shift: u16, value: u16) -> Self {
        Self((self.0 & !(FIELD_MASK << shift)) | ((value & FIELD_MASK) << shift))
    }

    pub fn averaging(self) -> Averaging {
        Averaging::from_field(self.0 >> AVERAGING_SHIFT)
    }

    pub fn with_averaging(self, value: Averaging) -> Self {
        self.with_field(AVERAGING_SHIFT, value as u16)
    }

    pub fn bus_conversion_time(self) -> ConversionTime {
        ConversionTime::from_field(self.0 >> BUS_CT_SHIFT)
    }

    pub fn with_bus_conversion_time(self, value: ConversionTime) -> Self {
        self.with_field(BUS_CT_SHIFT, value as u16)
    }

    pub fn shunt_conversion_time(self) -> ConversionTime {
        ConversionTime::from_field(self.0 >> SHUNT_CT_SHIFT)
    }

    pub fn with_shunt_conversion_time(self, value: ConversionTime) -> Self {
        self.with_field(SHUNT_CT_SHIFT, value as u16)
    }

    pub fn mode(self) -> Mode {
        Mode::from_field(self.0)
    }

    pub fn with_mode(self, value: Mode) -> Self {
        self.with_field(0, value as u16)
    }

    pub fn is_reset(self) -> bool {
        self.0 & RESET_BIT != 0
    }

    /// Worst-case time for one averaged conversion set, in microseconds.
    pub fn conversion_period_us(self) -> u32 {
        let mode = self.mode();
        let shunt = match mode {
            Mode::ShuntVoltageTriggered
            | Mode::ShuntAndBusTriggered
            | Mode::ShuntVoltageContinuous
            | Mode::ShuntAndBusContinuous => self.shunt_conversion_time().micros(),
            _ => 0,
        };
        let bus = match mode {
            Mode::BusVoltageTriggered
            | Mode::ShuntAndBusTriggered
            | Mode::BusVoltageContinuous
            | Mode::ShuntAndBusContinuous => self.bus_conversion_time().micros(),
            _ => 0,
        };
        (shunt + bus) * u32::from(self.averaging().samples())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_word() {
        assert_eq!(Configuration::DEFAULT.bits(), 0x0127);
        assert_eq!(Configuration::default(), Configuration::DEFAULT);
        assert_eq!(Configuration::DEFAULT.averaging(), Averaging::_1);
        assert_eq!(
            Configuration::DEFAULT.bus_conversion_time(),
            ConversionTime::_1_1_ms
        );
        assert_eq!(
            Configuration::DEFAULT.shunt_conversion_time(),
            ConversionTime::_1_1_ms
        );
        assert_eq!(Configuration::DEFAULT.mode(), Mode::ShuntAndBusContinuous);
        assert!(!Configuration::DEFAULT.is_reset());
    }

    #[test]
    fn setters_only_touch_their_field() {
        let config = Configuration::DEFAULT
            .with_averaging(Averaging::_1024)
            .with_bus_conversion_time(ConversionTime::_140_us)
            .with_shunt_conversion_time(ConversionTime::_8_244_ms)
            .with_mode(Mode::BusVoltageTriggered);

        assert_eq!(config.bits(), 0b0000_1110_0011_1010);
        assert_eq!(config.averaging(), Averaging::_1024);
        assert_eq!(config.bus_conversion_time(), ConversionTime::_140_us);
        assert_eq!(config.shunt_conversion_time(), ConversionTime::_8_244_ms);
        assert_eq!(config.mode(), Mode::BusVoltageTriggered);
        assert!(config.mode().is_triggered());
    }

    #[test]
    fn verbatim_word_round_trips() {
        let config = Configuration::from_bits(0x4527);
        assert_eq!(u16::from(config), 0x4527);
        assert_eq!(config.averaging(), Averaging::_16);
        assert!(Configuration::RESET.is_reset());
    }

    #[test]
    fn conversion_period() {
        assert_eq!(Configuration::DEFAULT.conversion_period_us(), 2200);
        let shunt_only = Configuration::DEFAULT
            .with_mode(Mode::ShuntVoltageTriggered)
            .with_averaging(Averaging::_16);
        assert_eq!(shunt_only.conversion_period_us(), 1100 * 16);
        assert_eq!(
            Configuration::DEFAULT
                .with_mode(Mode::PowerDown)
                .conversion_period_us(),
            0
        );
    }
}
