//! Calibration word derivation and raw-to-physical scaling.
//!
//! All factors below are fixed by the INA226 datasheet.

/// Shunt voltage register LSB: 2.5 uV, in millivolts.
pub const SHUNT_VOLTAGE_LSB_MV: f32 = 2.5e-3;
/// Bus voltage register LSB: 1.25 mV.
pub const BUS_VOLTAGE_LSB_MV: f32 = 1.25;
/// Power register LSB is always 25 current LSBs.
pub const POWER_LSB_RATIO: f32 = 25.0;
/// Internal fixed value of the calibration equation `CAL = 0.00512 / (Current_LSB * R_shunt)`.
pub const CALIBRATION_CONSTANT: f32 = 0.00512;
/// Positive full scale of the signed 16-bit current register (2^15).
pub const CURRENT_FULL_SCALE: f32 = 32768.0;
/// Shunt resistor fitted on the reference board, in ohms.
pub const DEFAULT_SHUNT_OHMS: f32 = 0.1;
/// Default expected full-scale current, in milliamps.
pub const DEFAULT_MAX_CURRENT_MA: i32 = 1000;

/// Bit 15 of the calibration register is reserved.
const CALIBRATION_MAX: f32 = 0x7FFF as f32;

/// Constants derived from the expected full-scale current and the shunt.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Value for the calibration register.
    pub word: u16,
    /// Milliamps per current register LSB.
    pub current_lsb_ma: f32,
    /// Milliwatts per power register LSB.
    pub power_lsb_mw: f32,
}

impl Calibration {
    /// Derives the calibration word and LSB sizes.
    ///
    /// The word is rounded half-up. Returns `None` when `max_current_ma` or
    /// `shunt_ohms` is not positive, or when the resulting word does not fit
    /// the 15-bit register (`1..=0x7FFF`).
    pub fn derive(max_current_ma: i32, shunt_ohms: f32) -> Option<Self> {
        if max_current_ma <= 0 || !(shunt_ohms > 0.0) {
            return None;
        }

        let current_lsb_a = max_current_ma as f32 / 1000.0 / CURRENT_FULL_SCALE;
        let exact = CALIBRATION_CONSTANT / (current_lsb_a * shunt_ohms);
        if !exact.is_finite() {
            return None;
        }

        let rounded = exact + 0.5;
        if rounded < 1.0 || rounded >= CALIBRATION_MAX + 1.0 {
            return None;
        }

        let current_lsb_ma = current_lsb_a * 1000.0;
        Some(Calibration {
            word: rounded as u16,
            current_lsb_ma,
            power_lsb_mw: current_lsb_ma * POWER_LSB_RATIO,
        })
    }
}

pub fn shunt_voltage_mv(raw: i16) -> f32 {
    f32::from(raw) * SHUNT_VOLTAGE_LSB_MV
}

pub fn bus_voltage_mv(raw: i16) -> f32 {
    f32::from(raw) * BUS_VOLTAGE_LSB_MV
}

pub fn scale(raw: i16, lsb: f32) -> f32 {
    f32::from(raw) * lsb
}

/// Drops the fractional part, rounding toward zero.
pub fn truncate(value: f32) -> i32 {
    value as i32
}
