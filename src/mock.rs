//! Mock GPIO backend for testing
//!
//! [`MockGpio`] models the port blocks in memory and records every hardware
//! call in an event log, so tests can check both the resulting pin state and
//! the order in which registers were touched.
//!
//! # Feature Gate
//!
//! Available in test builds and with the `mock` feature.
use crate::gpio::{ClockGate, GpioError, PinDriver, PinMode, Port, Speed};
use heapless::Vec;

/// Capacity of the event log. Recording more events panics
pub const EVENT_CAPACITY: usize = 128;

const PINS_PER_PORT: usize = 32;

/// One recorded hardware call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEvent {
    ClockEnabled(Port),
    ClockDisabled(Port),
    Write { port: Port, num: u8, high: bool },
    Toggle { port: Port, num: u8 },
    Configure { port: Port, num: u8, mode: PinMode },
    Deconfigure { port: Port, num: u8 },
}

#[derive(Debug, Clone, Copy)]
struct MockPort {
    present: bool,
    clocked: bool,
    /// Output latch
    out: u32,
    /// Level applied from outside
    input: u32,
    modes: [Option<(PinMode, Speed)>; PINS_PER_PORT],
}

impl MockPort {
    const fn new(present: bool) -> Self {
        MockPort {
            present,
            clocked: false,
            out: 0,
            input: 0,
            modes: [None; PINS_PER_PORT],
        }
    }
}

#[derive(Debug)]
pub struct MockGpio {
    ports: [MockPort; Port::COUNT],
    events: Vec<MockEvent, EVENT_CAPACITY>,
}

impl MockGpio {
    /// Create a mock with all ports present
    pub fn new() -> Self {
        Self::with_ports(&Port::ALL)
    }

    /// Create a mock where only the given ports exist
    pub fn with_ports(ports: &[Port]) -> Self {
        let mut mock = MockGpio {
            ports: [MockPort::new(false); Port::COUNT],
            events: Vec::new(),
        };
        for port in ports {
            mock.ports[port.index()].present = true;
        }
        mock
    }

    /// Simulate an external signal on a pin
    pub fn set_input_level(&mut self, port: Port, num: u8, high: bool) {
        let port = &mut self.ports[port.index()];
        if high {
            port.input |= 1 << num;
        } else {
            port.input &= !(1 << num);
        }
    }

    /// Current level of the output latch
    pub fn output_latch(&self, port: Port, num: u8) -> bool {
        (self.ports[port.index()].out >> num) & 0x01 == 1
    }

    /// Configured mode, `None` while the pin is in its reset configuration
    pub fn mode(&self, port: Port, num: u8) -> Option<PinMode> {
        self.ports[port.index()].modes[num as usize].map(|(mode, _)| mode)
    }

    /// Configured speed, [`Speed::Low`] for unconfigured pins
    pub fn speed(&self, port: Port, num: u8) -> Speed {
        self.ports[port.index()].modes[num as usize]
            .map(|(_, speed)| speed)
            .unwrap_or_default()
    }

    pub fn clock_enabled(&self, port: Port) -> bool {
        self.ports[port.index()].clocked
    }

    /// All hardware calls so far, oldest first
    pub fn events(&self) -> &[MockEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn record(&mut self, event: MockEvent) {
        if self.events.push(event).is_err() {
            panic!("mock event log full after {} events", EVENT_CAPACITY);
        }
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl PinDriver for MockGpio {
    fn write_pin(&mut self, port: Port, num: u8, high: bool) {
        let reg = &mut self.ports[port.index()];
        if high {
            reg.out |= 1 << num;
        } else {
            reg.out &= !(1 << num);
        }
        self.record(MockEvent::Write { port, num, high });
    }

    fn read_pin(&self, port: Port, num: u8) -> bool {
        let reg = &self.ports[port.index()];
        let level = match self.mode(port, num) {
            Some(PinMode::Output(_)) => reg.out,
            _ => reg.input,
        };
        (level >> num) & 0x01 == 1
    }

    fn toggle_pin(&mut self, port: Port, num: u8) {
        self.ports[port.index()].out ^= 1 << num;
        self.record(MockEvent::Toggle { port, num });
    }

    fn configure_pin(&mut self, port: Port, num: u8, mode: PinMode, speed: Speed) {
        self.ports[port.index()].modes[num as usize] = Some((mode, speed));
        self.record(MockEvent::Configure { port, num, mode });
    }

    fn deconfigure_pin(&mut self, port: Port, num: u8) {
        self.ports[port.index()].modes[num as usize] = None;
        self.record(MockEvent::Deconfigure { port, num });
    }
}

impl ClockGate for MockGpio {
    fn enable_clock(&mut self, port: Port) -> Result<(), GpioError> {
        let reg = &mut self.ports[port.index()];
        if !reg.present {
            return Err(GpioError::UnknownPort);
        }
        reg.clocked = true;
        self.record(MockEvent::ClockEnabled(port));
        Ok(())
    }

    fn disable_clock(&mut self, port: Port) -> Result<(), GpioError> {
        let reg = &mut self.ports[port.index()];
        if !reg.present {
            return Err(GpioError::UnknownPort);
        }
        reg.clocked = false;
        self.record(MockEvent::ClockDisabled(port));
        Ok(())
    }
}
