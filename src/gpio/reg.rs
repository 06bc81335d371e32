//! # VA108xx register backend
//!
//! [`Va108xxGpio`] implements [`PinDriver`] and [`ClockGate`] on top of the
//! `va108xx` PAC. It takes ownership of the SYSCONFIG, IOCONFIG, PORTA and
//! PORTB peripherals, so it is the only code touching these registers while
//! it exists.
//!
//! ```ignore
//! let dp = pac::Peripherals::take().unwrap();
//! let hw = Va108xxGpio::new(dp.SYSCONFIG, dp.IOCONFIG, dp.PORTA, dp.PORTB);
//! let mut gpio = GpioManager::new(&BOARD_PINS, hw);
//! gpio.init()?;
//! ```
use super::{ClockGate, GpioError, OutputKind, PinDriver, PinMode, Port, Pull, Speed};
use crate::clock::{self, PeripheralClocks};
use paste::paste;
use va108xx::{ioconfig, porta, IOCONFIG, PORTA, PORTB, SYSCONFIG};

/// Type definition to avoid confusion: These register blocks are identical
type PortRegisterBlock = porta::RegisterBlock;

//==================================================================================================
//  ModeFields
//==================================================================================================

/// Collect all fields needed to set the [`PinMode`]
#[derive(Default)]
struct ModeFields {
    dir: bool,
    opendrn: bool,
    pull_en: bool,
    /// true for pullup, false for pulldown
    pull_dir: bool,
    funsel: u8,
    enb_input: bool,
}

impl From<PinMode> for ModeFields {
    #[inline]
    fn from(mode: PinMode) -> Self {
        let mut fields = Self::default();
        match mode {
            PinMode::Input(pull) => {
                fields.dir = false;
                match pull {
                    Pull::Floating => {
                        fields.pull_en = false;
                    }
                    Pull::PullUp => {
                        fields.pull_en = true;
                        fields.pull_dir = true;
                    }
                    Pull::PullDown => {
                        fields.pull_en = true;
                        fields.pull_dir = false;
                    }
                }
            }
            PinMode::Output(kind) => {
                fields.dir = true;
                // Keep the input path enabled so the driven level can be read back
                fields.enb_input = true;
                fields.opendrn = kind == OutputKind::OpenDrain;
            }
            PinMode::Alternate(funsel) => {
                fields.funsel = funsel as u8;
            }
            // No analog function on the VA108xx pads: leave the pin undriven
            // and without pull
            PinMode::Analog => (),
        }
        fields
    }
}

//==================================================================================================
//  Register access
//==================================================================================================

pub type IocfgPort = ioconfig::PORTA;
#[repr(C)]
struct IocfgPortGroup {
    port: [IocfgPort; 32],
}

/// Set or clear the clock bit of a port in PERIPHERAL_CLK_ENABLE
macro_rules! port_clock {
    ($syscfg:expr, $port:expr, $action:ident, [$($Port:ident),+]) => {
        paste! {
            match $port {
                $(
                    Port::$Port => $syscfg
                        .peripheral_clk_enable
                        .modify(|_, w| w.[<port $Port:lower>]().$action()),
                )+
            }
        }
    };
}

/// GPIO hardware of the VA108xx
pub struct Va108xxGpio {
    syscfg: SYSCONFIG,
    iocfg: IOCONFIG,
    porta: PORTA,
    portb: PORTB,
}

impl Va108xxGpio {
    /// Take ownership of the peripherals. No register is written
    pub fn new(syscfg: SYSCONFIG, iocfg: IOCONFIG, porta: PORTA, portb: PORTB) -> Self {
        Va108xxGpio {
            syscfg,
            iocfg,
            porta,
            portb,
        }
    }

    /// Give the peripherals back
    pub fn release(self) -> (SYSCONFIG, IOCONFIG, PORTA, PORTB) {
        (self.syscfg, self.iocfg, self.porta, self.portb)
    }

    /// Peripheral ID of a port block. Requires the port clock
    pub fn perid(&self, port: Port) -> u32 {
        self.port_reg(port).perid.read().bits()
    }

    #[inline]
    fn port_reg(&self, port: Port) -> &PortRegisterBlock {
        match port {
            Port::A => &self.porta,
            Port::B => &self.portb,
        }
    }

    #[inline]
    fn iocfg_port(&self, port: Port) -> &IocfgPortGroup {
        // Safety: The IOCONFIG block starts with the 32 PORTA words followed by the
        // PORTB words, and `self` owns IOCONFIG
        unsafe { &*(IOCONFIG::ptr() as *const IocfgPortGroup).add(port.index()) }
    }

    #[inline]
    fn set_dir(&mut self, port: Port, num: u8, output: bool) {
        let portreg = self.port_reg(port);
        let mask = 1 << num;
        // Safety: Only the bit for this pin is modified
        unsafe {
            if output {
                portreg.dir().modify(|r, w| w.bits(r.bits() | mask));
            } else {
                portreg.dir().modify(|r, w| w.bits(r.bits() & !mask));
            }
        }
    }
}

impl PinDriver for Va108xxGpio {
    /// Write the logic level of an output pin
    #[inline]
    fn write_pin(&mut self, port: Port, num: u8, high: bool) {
        let portreg = self.port_reg(port);
        // Safety: SETOUT and CLROUT are "mask" registers, and we only write the bit for
        // this pin
        unsafe {
            if high {
                portreg.setout().write(|w| w.bits(1 << num));
            } else {
                portreg.clrout().write(|w| w.bits(1 << num));
            }
        }
    }

    #[inline]
    fn read_pin(&self, port: Port, num: u8) -> bool {
        let portreg = self.port_reg(port);
        ((portreg.datainraw().read().bits() >> num) & 0x01) == 1
    }

    /// Toggle the logic level of an output pin
    #[inline]
    fn toggle_pin(&mut self, port: Port, num: u8) {
        let portreg = self.port_reg(port);
        // Safety: TOGOUT is a "mask" register, and we only write the bit for
        // this pin
        unsafe { portreg.togout().write(|w| w.bits(1 << num)) };
    }

    /// The VA108xx pads have a fixed drive strength, `_speed` is ignored
    fn configure_pin(&mut self, port: Port, num: u8, mode: PinMode, _speed: Speed) {
        let ModeFields {
            dir,
            funsel,
            opendrn,
            pull_dir,
            pull_en,
            enb_input,
        } = mode.into();
        self.iocfg_port(port).port[num as usize].write(|w| {
            w.opendrn().bit(opendrn);
            w.pen().bit(pull_en);
            w.plevel().bit(pull_dir);
            w.iewo().bit(enb_input);
            unsafe { w.funsel().bits(funsel) }
        });
        self.set_dir(port, num, dir);
    }

    fn deconfigure_pin(&mut self, port: Port, num: u8) {
        self.set_dir(port, num, false);
        self.iocfg_port(port).port[num as usize].reset();
    }
}

impl ClockGate for Va108xxGpio {
    /// Enable the port clock together with the shared GPIO and IOCONFIG clocks
    fn enable_clock(&mut self, port: Port) -> Result<(), GpioError> {
        clock::enable_peripheral_clock(&mut self.syscfg, PeripheralClocks::Gpio);
        clock::enable_peripheral_clock(&mut self.syscfg, PeripheralClocks::Ioconfig);
        port_clock!(self.syscfg, port, set_bit, [A, B]);
        // The clock has to be running before the next register access
        cortex_m::asm::dsb();
        Ok(())
    }

    /// Only the port clock is gated, GPIO and IOCONFIG stay clocked
    fn disable_clock(&mut self, port: Port) -> Result<(), GpioError> {
        port_clock!(self.syscfg, port, clear_bit, [A, B]);
        Ok(())
    }
}

impl Va108xxGpio {
    /// Returns whether the clock of a port is enabled
    pub fn clock_enabled(&self, port: Port) -> bool {
        clock::peripheral_clock_enabled(&self.syscfg, port.into())
    }
}
