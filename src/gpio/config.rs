//! # Pin configuration records
//!
//! A board describes its pins with a table of [`PinConfig`] records, usually a
//! `static` array declared with [`pin_table!`](crate::pin_table). The
//! [`GpioManager`](super::GpioManager) walks this table on initialization and
//! uses it to resolve pin indices afterwards.
//!
//! ```
//! use va108xx_gpio::gpio::{OutputKind, PinConfig, PinState, Port, Pull};
//!
//! static PINS: [PinConfig; 2] = [
//!     PinConfig::output(Port::A, 10, OutputKind::PushPull, PinState::High),
//!     PinConfig::input(Port::B, 23, Pull::PullUp),
//! ];
//! ```
use super::GpioError;

//==================================================================================================
//  Ports
//==================================================================================================

/// Port blocks present on the VA108xx
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A = 0,
    B = 1,
}

impl Port {
    /// Number of port blocks
    pub const COUNT: usize = 2;
    /// All ports, in register order
    pub const ALL: [Port; Port::COUNT] = [Port::A, Port::B];

    /// Number of pins wired out on this port
    #[inline]
    pub const fn width(self) -> u8 {
        match self {
            Port::A => 32,
            Port::B => 24,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Port {
    type Error = GpioError;

    fn try_from(id: u8) -> Result<Self, GpioError> {
        match id {
            0 => Ok(Port::A),
            1 => Ok(Port::B),
            _ => Err(GpioError::UnknownPort),
        }
    }
}

//==================================================================================================
//  Pin modes
//==================================================================================================

/// Pull resistor configuration of an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    Floating,
    PullDown,
    PullUp,
}

/// Output driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputKind {
    /// Actively drives both levels
    PushPull,
    /// Only pulls low, high level comes from an external pull-up
    OpenDrain,
}

/// Function select. FUNSEL0 is the regular GPIO configuration
#[derive(Debug, Eq, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Funsel {
    Funsel1 = 0b01,
    Funsel2 = 0b10,
    Funsel3 = 0b11,
}

/// Electrical and functional mode of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input(Pull),
    Output(OutputKind),
    Alternate(Funsel),
    Analog,
}

impl PinMode {
    #[inline]
    pub const fn is_output(self) -> bool {
        matches!(self, PinMode::Output(_))
    }
}

/// Output slew-rate class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    #[default]
    Low,
    Medium,
    High,
    VeryHigh,
}

//==================================================================================================
//  Pin state
//==================================================================================================

/// Logic level of a pin
///
/// [`PinState::Unknown`] is only used as "leave untouched": as the initial
/// state of an output it skips the preset write, and passing it to
/// [`GpioManager::set`](super::GpioManager::set) does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    Low = 0,
    High = 1,
    Unknown = 2,
}

impl From<bool> for PinState {
    #[inline]
    fn from(high: bool) -> Self {
        if high {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

impl From<embedded_hal::digital::v2::PinState> for PinState {
    #[inline]
    fn from(state: embedded_hal::digital::v2::PinState) -> Self {
        match state {
            embedded_hal::digital::v2::PinState::Low => PinState::Low,
            embedded_hal::digital::v2::PinState::High => PinState::High,
        }
    }
}

impl core::ops::Not for PinState {
    type Output = PinState;

    fn not(self) -> PinState {
        match self {
            PinState::Low => PinState::High,
            PinState::High => PinState::Low,
            PinState::Unknown => PinState::Unknown,
        }
    }
}

//==================================================================================================
//  PinConfig
//==================================================================================================

/// Configuration record of a single pin
///
/// Records can only be built through [`PinConfig::new`] and its shorthands,
/// so `num` is always a pin of `port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    port: Port,
    num: u8,
    mode: PinMode,
    speed: Speed,
    init_state: PinState,
}

impl PinConfig {
    /// Create a new record
    ///
    /// Panics if `num` is not a pin of `port`. In a `static` table this is a
    /// compile error.
    pub const fn new(
        port: Port,
        num: u8,
        mode: PinMode,
        speed: Speed,
        init_state: PinState,
    ) -> Self {
        assert!(num < port.width(), "pin number out of range for port");
        PinConfig {
            port,
            num,
            mode,
            speed,
            init_state,
        }
    }

    pub const fn input(port: Port, num: u8, pull: Pull) -> Self {
        Self::new(port, num, PinMode::Input(pull), Speed::Low, PinState::Unknown)
    }

    pub const fn output(port: Port, num: u8, kind: OutputKind, init_state: PinState) -> Self {
        Self::new(port, num, PinMode::Output(kind), Speed::Low, init_state)
    }

    pub const fn alternate(port: Port, num: u8, funsel: Funsel) -> Self {
        Self::new(port, num, PinMode::Alternate(funsel), Speed::Low, PinState::Unknown)
    }

    pub const fn analog(port: Port, num: u8) -> Self {
        Self::new(port, num, PinMode::Analog, Speed::Low, PinState::Unknown)
    }

    pub const fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    #[inline]
    pub const fn port(&self) -> Port {
        self.port
    }

    /// Pin number inside the port, always below [`Port::width`]
    #[inline]
    pub const fn num(&self) -> u8 {
        self.num
    }

    #[inline]
    pub const fn mode(&self) -> PinMode {
        self.mode
    }

    #[inline]
    pub const fn speed(&self) -> Speed {
        self.speed
    }

    /// Level driven before an output is enabled. Ignored for other modes
    #[inline]
    pub const fn init_state(&self) -> PinState {
        self.init_state
    }

    /// Single-bit mask of this pin inside its port registers
    #[inline]
    pub const fn mask(&self) -> u32 {
        1 << self.num
    }

    /// Level to preset before the mode is applied, if any
    #[inline]
    pub const fn preset_level(&self) -> Option<bool> {
        if !self.mode.is_output() {
            return None;
        }
        match self.init_state {
            PinState::High => Some(true),
            PinState::Low => Some(false),
            PinState::Unknown => None,
        }
    }
}

//==================================================================================================
//  Lookup
//==================================================================================================

/// Source of pin configuration records
///
/// `pin_config` only has to handle indices below `pin_count`; the manager
/// never asks for others.
pub trait PinConfigProvider {
    fn pin_count(&self) -> usize;
    fn pin_config(&self, pin: usize) -> PinConfig;
}

impl PinConfigProvider for [PinConfig] {
    #[inline]
    fn pin_count(&self) -> usize {
        self.len()
    }
    #[inline]
    fn pin_config(&self, pin: usize) -> PinConfig {
        self[pin]
    }
}

impl<const N: usize> PinConfigProvider for [PinConfig; N] {
    #[inline]
    fn pin_count(&self) -> usize {
        N
    }
    #[inline]
    fn pin_config(&self, pin: usize) -> PinConfig {
        self[pin]
    }
}

impl<T: PinConfigProvider + ?Sized> PinConfigProvider for &T {
    #[inline]
    fn pin_count(&self) -> usize {
        (**self).pin_count()
    }
    #[inline]
    fn pin_config(&self, pin: usize) -> PinConfig {
        (**self).pin_config(pin)
    }
}

/// Declare a `static` pin table together with an index enum naming its entries
///
/// ```
/// use va108xx_gpio::gpio::{OutputKind, PinConfig, PinState, Port, Pull};
///
/// va108xx_gpio::pin_table! {
///     pub static BOARD_PINS: BoardPin = {
///         Led => PinConfig::output(Port::A, 10, OutputKind::PushPull, PinState::Low),
///         Button => PinConfig::input(Port::B, 23, Pull::PullUp),
///     }
/// }
///
/// assert_eq!(BOARD_PINS.len(), BoardPin::COUNT);
/// assert_eq!(usize::from(BoardPin::Button), 1);
/// ```
#[macro_export]
macro_rules! pin_table {
    (
        $vis:vis static $Table:ident : $Index:ident = {
            $($Pin:ident => $cfg:expr),+ $(,)?
        }
    ) => {
        $crate::paste::paste! {
            #[doc = "Entries of the [`" $Table "`] pin table"]
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            #[repr(usize)]
            $vis enum $Index {
                $(
                    #[doc = "Pin " $Pin]
                    $Pin,
                )+
            }

            impl $Index {
                /// Number of entries in the table
                pub const COUNT: usize = [$(stringify!($Pin)),+].len();
            }

            impl From<$Index> for usize {
                #[inline]
                fn from(pin: $Index) -> usize {
                    pin as usize
                }
            }

            #[doc = "Pin table indexed by [`" $Index "`]"]
            $vis static $Table: [$crate::gpio::PinConfig; $Index::COUNT] = [$($cfg),+];
        }
    };
}
