//! # Table-driven GPIO manager
//!
//! [`GpioManager`] owns a pin table and a hardware backend and tracks
//! whether the pins have been initialized. It has two states:
//!
//! - uninitialized: only [`init`](GpioManager::init), the clock functions
//!   and the query functions do anything
//! - initialized: all pins of the table are clocked and configured and can
//!   be read, written and toggled by index
//!
//! Pin access in the wrong state or with an index outside the table is a
//! caller bug. With `debug_assertions` enabled it panics, otherwise the call
//! returns the matching [`GpioError`] without touching the hardware.
use super::{
    pin::ManagedPin, ClockGate, GpioError, PinConfig, PinConfigProvider, PinDriver, PinState,
    Port,
};

/// Owner of a pin table and the hardware backend driving it
///
/// `T` provides the [`PinConfig`] records, `H` is the backend. Pins are
/// addressed by their index in the table.
pub struct GpioManager<T, H> {
    table: T,
    hw: H,
    initialized: bool,
}

impl<T, H> GpioManager<T, H> {
    /// Create an uninitialized manager. No hardware is accessed
    pub const fn new(table: T, hw: H) -> Self {
        GpioManager {
            table,
            hw,
            initialized: false,
        }
    }

    #[inline]
    pub fn is_init(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// Direct access to the backend, bypassing the initialization guard
    #[inline]
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Release the table and the backend. The pins keep their configuration
    pub fn free(self) -> (T, H) {
        (self.table, self.hw)
    }
}

impl<T: PinConfigProvider, H: PinDriver + ClockGate> GpioManager<T, H> {
    /// Clock and configure every pin of the table
    ///
    /// Does nothing if already initialized. Outputs with a defined initial
    /// state get that level latched before their mode is applied, so the pin
    /// never drives an uncommanded level.
    ///
    /// If a port clock can not be enabled, the pins configured so far are
    /// returned to their reset configuration and the manager stays
    /// uninitialized.
    pub fn init(&mut self) -> Result<(), GpioError> {
        if self.initialized {
            return Ok(());
        }
        let count = self.table.pin_count();
        for pin in 0..count {
            let cfg = self.table.pin_config(pin);
            if let Err(e) = self.hw.enable_clock(cfg.port()) {
                log_error!("gpio init: pin {} on port {:?}: {}", pin, cfg.port(), e);
                self.rollback(pin);
                return Err(e);
            }
            if let Some(high) = cfg.preset_level() {
                self.hw.write_pin(cfg.port(), cfg.num(), high);
            }
            self.hw.configure_pin(cfg.port(), cfg.num(), cfg.mode(), cfg.speed());
            log_debug!("gpio: pin {} -> {:?}", pin, cfg.mode());
        }
        self.initialized = true;
        log_info!("gpio: {} pins initialized", count);
        Ok(())
    }

    /// Deconfigure pins `0..end` in reverse order
    fn rollback(&mut self, end: usize) {
        for pin in (0..end).rev() {
            let cfg = self.table.pin_config(pin);
            self.hw.deconfigure_pin(cfg.port(), cfg.num());
        }
    }

    /// Return every pin of the table to its reset configuration
    ///
    /// Port clocks are left enabled. Does nothing if not initialized.
    pub fn deinit(&mut self) -> Result<(), GpioError> {
        if self.initialized {
            let count = self.table.pin_count();
            for pin in 0..count {
                let cfg = self.table.pin_config(pin);
                self.hw.deconfigure_pin(cfg.port(), cfg.num());
            }
            self.initialized = false;
            log_info!("gpio: {} pins deinitialized", count);
        }
        Ok(())
    }

    #[inline]
    pub fn pin_count(&self) -> usize {
        self.table.pin_count()
    }

    /// Configuration record of a pin, `None` if the index is outside the table
    pub fn pin_config(&self, pin: impl Into<usize>) -> Option<PinConfig> {
        let pin = pin.into();
        if pin < self.table.pin_count() {
            Some(self.table.pin_config(pin))
        } else {
            None
        }
    }

    /// Check the access preconditions and resolve the pin
    fn checked(&self, pin: usize) -> Result<PinConfig, GpioError> {
        let result = if !self.initialized {
            Err(GpioError::NotInitialized)
        } else if pin >= self.table.pin_count() {
            Err(GpioError::InvalidPin(pin))
        } else {
            Ok(self.table.pin_config(pin))
        };
        if let Err(e) = result {
            log_warn!("gpio: rejected access to pin {}: {}", pin, e);
            if cfg!(debug_assertions) {
                panic!("gpio contract violation: {}", e);
            }
        }
        result
    }

    /// Read the live level of a pin
    pub fn get(&self, pin: impl Into<usize>) -> Result<PinState, GpioError> {
        let cfg = self.checked(pin.into())?;
        Ok(self.hw.read_pin(cfg.port(), cfg.num()).into())
    }

    /// Drive a pin. [`PinState::Unknown`] leaves the pin untouched
    pub fn set(&mut self, pin: impl Into<usize>, state: PinState) -> Result<(), GpioError> {
        let cfg = self.checked(pin.into())?;
        match state {
            PinState::High => self.hw.write_pin(cfg.port(), cfg.num(), true),
            PinState::Low => self.hw.write_pin(cfg.port(), cfg.num(), false),
            PinState::Unknown => (),
        }
        Ok(())
    }

    pub fn toggle(&mut self, pin: impl Into<usize>) -> Result<(), GpioError> {
        let cfg = self.checked(pin.into())?;
        self.hw.toggle_pin(cfg.port(), cfg.num());
        Ok(())
    }

    /// Borrow a pin as an embedded-hal compatible handle
    pub fn pin(&mut self, pin: impl Into<usize>) -> Result<ManagedPin<'_, T, H>, GpioError> {
        let pin = pin.into();
        self.checked(pin)?;
        Ok(ManagedPin::new(self, pin))
    }

    /// Enable the peripheral clock of a port
    ///
    /// Independent of the initialization state. There is no reference
    /// counting with [`disable_port_clock`](Self::disable_port_clock).
    pub fn enable_port_clock(&mut self, port: Port) -> Result<(), GpioError> {
        self.hw.enable_clock(port).map_err(|e| {
            log_error!("gpio: enabling clock of port {:?} failed: {}", port, e);
            e
        })
    }

    /// Disable the peripheral clock of a port
    ///
    /// Pins of the table on this port stop working until the clock is
    /// enabled again. This is not tracked.
    pub fn disable_port_clock(&mut self, port: Port) -> Result<(), GpioError> {
        self.hw.disable_clock(port).map_err(|e| {
            log_error!("gpio: disabling clock of port {:?} failed: {}", port, e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::{OutputKind, PinMode, Pull, Speed};
    use crate::mock::{MockEvent, MockGpio};

    crate::pin_table! {
        static SCENARIO: ScenarioPin = {
            Led => PinConfig::output(Port::A, 0, OutputKind::PushPull, PinState::High),
            Button => PinConfig::input(Port::A, 1, Pull::Floating),
        }
    }

    static MIXED: [PinConfig; 5] = [
        PinConfig::output(Port::A, 3, OutputKind::PushPull, PinState::High),
        PinConfig::output(Port::A, 4, OutputKind::OpenDrain, PinState::Low),
        PinConfig::output(Port::B, 5, OutputKind::PushPull, PinState::Unknown),
        PinConfig::input(Port::B, 6, Pull::PullUp),
        PinConfig::output(Port::B, 7, OutputKind::PushPull, PinState::High)
            .with_speed(Speed::High),
    ];

    fn initialized<T: PinConfigProvider>(table: T) -> GpioManager<T, MockGpio> {
        let mut gpio = GpioManager::new(table, MockGpio::new());
        gpio.init().unwrap();
        gpio
    }

    #[test]
    fn init_sets_flag() {
        let mut gpio = GpioManager::new(&MIXED, MockGpio::new());
        assert!(!gpio.is_init());
        assert_eq!(gpio.init(), Ok(()));
        assert!(gpio.is_init());
    }

    #[test]
    fn init_is_idempotent() {
        let mut gpio = initialized(&MIXED);
        gpio.toggle(0usize).unwrap();
        let events = gpio.hardware().events().len();
        let level = gpio.get(0usize).unwrap();
        assert_eq!(gpio.init(), Ok(()));
        assert!(gpio.is_init());
        assert_eq!(gpio.hardware().events().len(), events);
        assert_eq!(gpio.get(0usize), Ok(level));
    }

    #[test]
    fn outputs_start_at_initial_state() {
        let gpio = initialized(&MIXED);
        for pin in 0..gpio.pin_count() {
            let cfg = gpio.pin_config(pin).unwrap();
            match cfg.preset_level() {
                Some(high) => assert_eq!(gpio.get(pin), Ok(PinState::from(high))),
                None => assert!(gpio.get(pin).is_ok()),
            }
        }
        assert_eq!(gpio.get(0usize), Ok(PinState::High));
        assert_eq!(gpio.get(1usize), Ok(PinState::Low));
    }

    #[test]
    fn clock_and_preset_precede_configuration() {
        let gpio = initialized(&MIXED);
        let events = gpio.hardware().events();
        for cfg in MIXED.iter() {
            let configured = events
                .iter()
                .position(|e| {
                    matches!(e, MockEvent::Configure { port, num, .. }
                        if *port == cfg.port() && *num == cfg.num())
                })
                .unwrap();
            let clocked = events
                .iter()
                .position(|e| *e == MockEvent::ClockEnabled(cfg.port()))
                .unwrap();
            assert!(clocked < configured);
            let preset = events.iter().position(|e| {
                matches!(e, MockEvent::Write { port, num, .. }
                    if *port == cfg.port() && *num == cfg.num())
            });
            match cfg.preset_level() {
                Some(_) => assert!(preset.unwrap() < configured),
                None => assert_eq!(preset, None),
            }
        }
    }

    #[test]
    fn configuration_reaches_hardware() {
        let gpio = initialized(&MIXED);
        let hw = gpio.hardware();
        assert_eq!(
            hw.mode(Port::A, 4),
            Some(PinMode::Output(OutputKind::OpenDrain))
        );
        assert_eq!(hw.mode(Port::B, 6), Some(PinMode::Input(Pull::PullUp)));
        assert_eq!(hw.speed(Port::B, 7), Speed::High);
        assert!(hw.clock_enabled(Port::A));
        assert!(hw.clock_enabled(Port::B));
    }

    #[test]
    fn deinit_resets_pins() {
        let mut gpio = initialized(&MIXED);
        assert_eq!(gpio.deinit(), Ok(()));
        assert!(!gpio.is_init());
        for cfg in MIXED.iter() {
            assert_eq!(gpio.hardware().mode(cfg.port(), cfg.num()), None);
        }
        // Second call is a no-op
        let events = gpio.hardware().events().len();
        assert_eq!(gpio.deinit(), Ok(()));
        assert_eq!(gpio.hardware().events().len(), events);
    }

    #[test]
    fn reinit_after_deinit() {
        let mut gpio = initialized(&MIXED);
        gpio.deinit().unwrap();
        gpio.init().unwrap();
        assert!(gpio.is_init());
        assert_eq!(
            gpio.hardware().mode(Port::A, 3),
            Some(PinMode::Output(OutputKind::PushPull))
        );
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "GPIO not initialized"))]
    fn get_after_deinit() {
        let mut gpio = initialized(&MIXED);
        gpio.deinit().unwrap();
        let events = gpio.hardware().events().len();
        assert_eq!(gpio.get(0usize), Err(GpioError::NotInitialized));
        assert_eq!(gpio.hardware().events().len(), events);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "GPIO not initialized"))]
    fn set_after_deinit() {
        let mut gpio = initialized(&MIXED);
        gpio.deinit().unwrap();
        let events = gpio.hardware().events().len();
        assert_eq!(
            gpio.set(0usize, PinState::Low),
            Err(GpioError::NotInitialized)
        );
        assert_eq!(gpio.hardware().events().len(), events);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "GPIO not initialized"))]
    fn toggle_before_init() {
        let mut gpio = GpioManager::new(&MIXED, MockGpio::new());
        assert_eq!(gpio.toggle(0usize), Err(GpioError::NotInitialized));
        assert!(gpio.hardware().events().is_empty());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "pin index 5 out of range"))]
    fn pin_outside_table() {
        let mut gpio = initialized(&MIXED);
        let events = gpio.hardware().events().len();
        assert_eq!(gpio.toggle(5usize), Err(GpioError::InvalidPin(5)));
        assert_eq!(gpio.hardware().events().len(), events);
    }

    #[test]
    fn set_unknown_is_noop() {
        let mut gpio = initialized(&MIXED);
        for pin in 0..gpio.pin_count() {
            let before = gpio.get(pin).unwrap();
            let events = gpio.hardware().events().len();
            assert_eq!(gpio.set(pin, PinState::Unknown), Ok(()));
            assert_eq!(gpio.get(pin), Ok(before));
            assert_eq!(gpio.hardware().events().len(), events);
        }
    }

    #[test]
    fn set_drives_level() {
        let mut gpio = initialized(&MIXED);
        gpio.set(0usize, PinState::Low).unwrap();
        assert_eq!(gpio.get(0usize), Ok(PinState::Low));
        gpio.set(0usize, PinState::High).unwrap();
        assert_eq!(gpio.get(0usize), Ok(PinState::High));
    }

    #[test]
    fn double_toggle_restores_level() {
        let mut gpio = initialized(&MIXED);
        for pin in 0..gpio.pin_count() {
            let before = gpio.get(pin).unwrap();
            gpio.toggle(pin).unwrap();
            gpio.toggle(pin).unwrap();
            assert_eq!(gpio.get(pin), Ok(before));
        }
        gpio.toggle(0usize).unwrap();
        assert_eq!(gpio.get(0usize), Ok(PinState::Low));
    }

    #[test]
    fn two_pin_scenario() {
        let mut gpio = GpioManager::new(&SCENARIO, MockGpio::new());
        gpio.init().unwrap();
        assert_eq!(gpio.get(ScenarioPin::Led), Ok(PinState::High));

        // Writes to an input are absorbed by the output latch
        gpio.hardware_mut().set_input_level(Port::A, 1, false);
        assert_eq!(gpio.set(ScenarioPin::Button, PinState::High), Ok(()));
        assert_eq!(gpio.get(ScenarioPin::Button), Ok(PinState::Low));
        gpio.hardware_mut().set_input_level(Port::A, 1, true);
        assert_eq!(gpio.get(ScenarioPin::Button), Ok(PinState::High));
    }

    #[test]
    fn init_failure_rolls_back() {
        // Port B is missing on this backend
        let mut gpio = GpioManager::new(&MIXED, MockGpio::with_ports(&[Port::A]));
        assert_eq!(gpio.init(), Err(GpioError::UnknownPort));
        assert!(!gpio.is_init());
        let hw = gpio.hardware();
        assert_eq!(hw.mode(Port::A, 3), None);
        assert_eq!(hw.mode(Port::A, 4), None);
        assert_eq!(
            hw.events().last(),
            Some(&MockEvent::Deconfigure {
                port: Port::A,
                num: 3
            })
        );
    }

    #[test]
    fn port_clocks() {
        let mut gpio = GpioManager::new(&MIXED, MockGpio::with_ports(&[Port::A]));
        assert_eq!(gpio.enable_port_clock(Port::A), Ok(()));
        assert!(gpio.hardware().clock_enabled(Port::A));
        assert_eq!(gpio.disable_port_clock(Port::A), Ok(()));
        assert!(!gpio.hardware().clock_enabled(Port::A));

        assert_eq!(gpio.enable_port_clock(Port::B), Err(GpioError::UnknownPort));
        assert_eq!(gpio.disable_port_clock(Port::B), Err(GpioError::UnknownPort));
        assert!(!gpio.hardware().clock_enabled(Port::B));
        assert_eq!(gpio.hardware().events().len(), 2);
    }

    #[test]
    fn clock_from_raw_port_id() {
        let mut gpio = GpioManager::new(&MIXED, MockGpio::new());
        let result = Port::try_from(7).and_then(|port| gpio.enable_port_clock(port));
        assert_eq!(result, Err(GpioError::UnknownPort));
        assert!(gpio.hardware().events().is_empty());
    }

    #[test]
    fn pin_config_lookup() {
        let gpio = GpioManager::new(&MIXED, MockGpio::new());
        assert_eq!(gpio.pin_count(), 5);
        assert_eq!(gpio.pin_config(3usize), Some(MIXED[3]));
        assert_eq!(gpio.pin_config(5usize), None);
    }

    #[test]
    fn last_pin_of_each_port() {
        static EDGES: [PinConfig; 2] = [
            PinConfig::output(Port::A, 31, OutputKind::PushPull, PinState::High),
            PinConfig::output(Port::B, 23, OutputKind::PushPull, PinState::High),
        ];
        let mut gpio = initialized(&EDGES);
        for pin in 0..EDGES.len() {
            let cfg = gpio.pin_config(pin).unwrap();
            assert!(cfg.num() < cfg.port().width());
            assert_eq!(gpio.get(pin), Ok(PinState::High));
            gpio.toggle(pin).unwrap();
            assert_eq!(gpio.get(pin), Ok(PinState::Low));
        }
    }

    #[test]
    fn free_returns_parts() {
        let gpio = initialized(&MIXED);
        let (table, hw) = gpio.free();
        assert_eq!(table.len(), 5);
        assert!(hw.clock_enabled(Port::B));
    }
}
