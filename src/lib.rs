#![no_std]

pub use va108xx;
pub use va108xx as pac;

#[doc(hidden)]
pub use paste;

#[macro_use]
mod log;

pub mod clock;
pub mod gpio;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prelude;

pub use gpio::{GpioError, GpioManager, PinConfig, PinState, Port};
