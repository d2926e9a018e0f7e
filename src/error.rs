use core::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus transaction failed; the transport error is passed through.
    I2c(E),
    /// A bounded poll ran out of attempts.
    Timeout,
    /// Calibration inputs give no valid calibration word.
    Configuration,
    InvalidManufacturer,
    InvalidDie,
}

impl<E> Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(_) => write!(f, "Bus transaction failed"),
            Error::Timeout => write!(f, "Timed out waiting for the device"),
            Error::Configuration => write!(f, "Invalid calibration parameters"),
            Error::InvalidManufacturer => write!(f, "Invalid Manufacturer"),
            Error::InvalidDie => write!(f, "Invalid Die Number"),
        }
    }
}
