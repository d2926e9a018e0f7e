use core::fmt::Display;

/// Power-on default address (A0 = A1 = GND).
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Expected content of [`Register::ManufacturerId`] ("TI" in ASCII).
pub const MANUFACTURER_ID: u16 = 0x5449;
/// Expected content of [`Register::DieId`].
pub const DIE_ID: u16 = 0x2260;

/// Conversion Ready Flag in the Mask/Enable register.
pub(crate) const CONVERSION_READY_FLAG: u16 = 1 << 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    Configuration = 0x00,
    ShuntVoltage = 0x01,
    BusVoltage = 0x02,
    Power = 0x03,
    Current = 0x04,
    Calibration = 0x05,
    MaskEnable = 0x06,
    ManufacturerId = 0xFE,
    DieId = 0xFF,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Level an address pin (A0 or A1) is strapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pin {
    Gnd,
    Vs,
    Sda,
    Scl,
}

impl Display for Pin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Pin::Gnd => write!(f, "GND"),
            Pin::Vs => write!(f, "VS"),
            Pin::Sda => write!(f, "SDA"),
            Pin::Scl => write!(f, "SCL"),
        }
    }
}

impl Pin {
    const fn code(self) -> u8 {
        match self {
            Pin::Gnd => 0,
            Pin::Vs => 1,
            Pin::Sda => 2,
            Pin::Scl => 3,
        }
    }
}

/// 7-bit bus address derived from the A0/A1 strapping (datasheet table 2).
pub const fn address_from_pins(a0: Pin, a1: Pin) -> u8 {
    DEFAULT_ADDRESS | (a1.code() << 2) | a0.code()
}
