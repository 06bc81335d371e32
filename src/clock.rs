//! # Peripheral clock gating
//!
//! Every peripheral of the VA108xx sits behind a bit in the SYSCONFIG
//! `PERIPHERAL_CLK_ENABLE` register. Registers of a peripheral whose clock is
//! gated off can not be accessed.
use crate::gpio::Port;
use va108xx::SYSCONFIG;

/// Bit positions inside the `PERIPHERAL_CLK_ENABLE` register used by the
/// GPIO blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralClocks {
    PortA = 0,
    PortB = 1,
    Ioconfig = 22,
    Gpio = 24,
}

impl From<Port> for PeripheralClocks {
    #[inline]
    fn from(port: Port) -> Self {
        match port {
            Port::A => PeripheralClocks::PortA,
            Port::B => PeripheralClocks::PortB,
        }
    }
}

impl PeripheralClocks {
    #[inline]
    pub const fn mask(self) -> u32 {
        1 << self as u8
    }
}

pub fn enable_peripheral_clock(syscfg: &mut SYSCONFIG, clock: PeripheralClocks) {
    syscfg
        .peripheral_clk_enable
        .modify(|r, w| unsafe { w.bits(r.bits() | clock.mask()) });
}

/// Returns whether the clock of the given peripheral is currently enabled
pub fn peripheral_clock_enabled(syscfg: &SYSCONFIG, clock: PeripheralClocks) -> bool {
    syscfg.peripheral_clk_enable.read().bits() & clock.mask() != 0
}
