//! # embedded-hal handles for table pins
//!
//! A [`ManagedPin`] borrows the [`GpioManager`] mutably and forwards the
//! embedded-hal digital traits to it, so drivers written against
//! `embedded-hal` can use pins of the table.
//!
//! ```ignore
//! let mut led = gpio.pin(BoardPin::Led)?;
//! led.set_low()?;
//! led.toggle()?;
//! ```
use super::{ClockGate, GpioError, GpioManager, PinConfigProvider, PinDriver, PinState};
use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};

pub struct ManagedPin<'a, T, H> {
    manager: &'a mut GpioManager<T, H>,
    index: usize,
}

impl<'a, T, H> ManagedPin<'a, T, H> {
    #[inline]
    pub(super) fn new(manager: &'a mut GpioManager<T, H>, index: usize) -> Self {
        ManagedPin { manager, index }
    }

    /// Index of the pin inside the table
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<'a, T: PinConfigProvider, H: PinDriver + ClockGate> ManagedPin<'a, T, H> {
    #[inline]
    pub fn state(&self) -> Result<PinState, GpioError> {
        self.manager.get(self.index)
    }

    #[inline]
    pub fn set_state(&mut self, state: PinState) -> Result<(), GpioError> {
        self.manager.set(self.index, state)
    }
}

impl<'a, T: PinConfigProvider, H: PinDriver + ClockGate> OutputPin for ManagedPin<'a, T, H> {
    type Error = GpioError;
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::High)
    }
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::Low)
    }
}

impl<'a, T: PinConfigProvider, H: PinDriver + ClockGate> InputPin for ManagedPin<'a, T, H> {
    type Error = GpioError;
    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.state()? == PinState::High)
    }
    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        self.is_high().map(|v| !v)
    }
}

/// Reads back the live pin level, which equals the latch for outputs
impl<'a, T: PinConfigProvider, H: PinDriver + ClockGate> StatefulOutputPin
    for ManagedPin<'a, T, H>
{
    #[inline]
    fn is_set_high(&self) -> Result<bool, GpioError> {
        self.is_high()
    }
    #[inline]
    fn is_set_low(&self) -> Result<bool, GpioError> {
        self.is_low()
    }
}

impl<'a, T: PinConfigProvider, H: PinDriver + ClockGate> ToggleableOutputPin
    for ManagedPin<'a, T, H>
{
    type Error = GpioError;
    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.manager.toggle(self.index)
    }
}
