//! Hardware interface used by the [`GpioManager`](super::GpioManager)
//!
//! Pins are addressed by port and pin number. Implementations may assume the
//! port clock was enabled through [`ClockGate`] before any [`PinDriver`] call
//! on that port.
use super::{GpioError, PinMode, Port, Speed};

/// Register level access to single pins
pub trait PinDriver {
    /// Drive the output latch of the pin
    fn write_pin(&mut self, port: Port, num: u8, high: bool);

    /// Read the live electrical level of the pin
    fn read_pin(&self, port: Port, num: u8) -> bool;

    /// Invert the output latch of the pin
    fn toggle_pin(&mut self, port: Port, num: u8);

    /// Apply mode and speed. The output latch is left untouched
    fn configure_pin(&mut self, port: Port, num: u8, mode: PinMode, speed: Speed);

    /// Return the pin to its reset configuration
    fn deconfigure_pin(&mut self, port: Port, num: u8);
}

/// Peripheral clock gates of the port blocks
pub trait ClockGate {
    /// Returns [`GpioError::UnknownPort`] if the port does not exist here
    fn enable_clock(&mut self, port: Port) -> Result<(), GpioError>;

    /// Returns [`GpioError::UnknownPort`] if the port does not exist here
    fn disable_clock(&mut self, port: Port) -> Result<(), GpioError>;
}
