//! # GPIO module
//!
//! Pins are described once, in a static table of [`PinConfig`] records. A
//! [`GpioManager`] walks that table to clock and configure every pin and then
//! gives index based access to the pins:
//!
//! ```ignore
//! va108xx_gpio::pin_table! {
//!     pub static BOARD_PINS: BoardPin = {
//!         Led => PinConfig::output(Port::A, 10, OutputKind::PushPull, PinState::High),
//!         Button => PinConfig::input(Port::B, 23, Pull::PullUp),
//!     }
//! }
//!
//! let hw = Va108xxGpio::new(dp.SYSCONFIG, dp.IOCONFIG, dp.PORTA, dp.PORTB);
//! let mut gpio = GpioManager::new(&BOARD_PINS, hw);
//! gpio.init()?;
//! gpio.toggle(BoardPin::Led)?;
//! ```
//!
//! The manager talks to the hardware through the [`PinDriver`] and
//! [`ClockGate`] traits. [`Va108xxGpio`] implements them for the VA108xx
//! registers, [`MockGpio`](crate::mock::MockGpio) for host tests.
//!
//! ## Examples
//!
//! - Blinky demo: `demos/blinky.rs`
pub mod config;
pub use config::*;

mod driver;
pub use driver::*;

mod error;
pub use error::GpioError;

pub mod manager;
pub use manager::GpioManager;

pub mod pin;
pub use pin::ManagedPin;

mod reg;
pub use reg::Va108xxGpio;
