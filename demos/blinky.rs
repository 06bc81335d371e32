//! Simple blinky example driven by a pin table
//!
//! Additional note on LEDs when using the REB1 development board:
//! Be not afraid: Pulling the GPIOs low makes the LEDs blink. See REB1
//! schematic for more details. The table therefore starts all LEDs high (off).
#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;
use va108xx_gpio::{
    gpio::{GpioManager, OutputKind, PinConfig, PinState, Port, Va108xxGpio},
    pac, pin_table,
};

pin_table! {
    static LEDS: Led = {
        Led1 => PinConfig::output(Port::A, 10, OutputKind::PushPull, PinState::High),
        Led2 => PinConfig::output(Port::A, 7, OutputKind::PushPull, PinState::High),
        Led3 => PinConfig::output(Port::A, 6, OutputKind::PushPull, PinState::High),
    }
}

const DELAY_CYCLES: u32 = 10_000_000;

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();
    let hw = Va108xxGpio::new(dp.SYSCONFIG, dp.IOCONFIG, dp.PORTA, dp.PORTB);
    let mut gpio = GpioManager::new(&LEDS, hw);
    gpio.init().unwrap();

    for _ in 0..10 {
        for led in [Led::Led1, Led::Led2, Led::Led3] {
            gpio.set(led, PinState::Low).ok();
        }
        cortex_m::asm::delay(DELAY_CYCLES);
        for led in [Led::Led1, Led::Led2, Led::Led3] {
            gpio.set(led, PinState::High).ok();
        }
        cortex_m::asm::delay(DELAY_CYCLES);
    }
    loop {
        for led in [Led::Led1, Led::Led2, Led::Led3] {
            gpio.toggle(led).ok();
            cortex_m::asm::delay(DELAY_CYCLES);
        }
    }
}
