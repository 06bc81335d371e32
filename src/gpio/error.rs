use core::fmt;

/// GPIO error type
///
/// Every variant names the precondition of the failed call. Output values of
/// a failed call must not be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// The manager was not initialized with [`init`](super::GpioManager::init)
    NotInitialized,
    /// The pin index is outside of the pin table
    InvalidPin(usize),
    /// The port is not present on this target or backend
    UnknownPort,
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::NotInitialized => write!(f, "GPIO not initialized"),
            GpioError::InvalidPin(pin) => write!(f, "pin index {} out of range", pin),
            GpioError::UnknownPort => write!(f, "unknown port"),
        }
    }
}
