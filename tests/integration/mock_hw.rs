//! Mock panel hardware for integration tests.
//!
//! One struct implements every port the scan engine uses.  The clock is
//! shared with [`MockDelay`] so a blocking `run_tick` advances simulated
//! time instead of sleeping.  Every output latch and relay write is
//! recorded so tests can assert on the full history.  Cascade transfers
//! can be given a cost in simulated time, like a bit-banged chain.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use zoneguard::app::events::AppEvent;
use zoneguard::app::ports::{
    ClockPort, ControlPort, EventSink, InputCascade, OutputCascade, RelayPort,
};

// ── Clock ─────────────────────────────────────────────────────

/// Microseconds since boot, full width.  Both port counters truncate it.
#[derive(Clone, Default)]
pub struct SharedClock(Rc<Cell<u64>>);

#[allow(dead_code)]
impl SharedClock {
    pub fn set_ms(&self, ms: u64) {
        self.0.set(ms * 1000);
    }

    pub fn advance_us(&self, us: u64) {
        self.0.set(self.0.get() + us);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1000);
    }
}

/// Delay that only moves the shared clock forward.
pub struct MockDelay {
    pub clock: SharedClock,
    pub slept_us: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.slept_us += u64::from(us);
        self.clock.advance_us(u64::from(us));
    }
}

// ── MockPanel ─────────────────────────────────────────────────

pub struct MockPanel {
    pub clock: SharedClock,
    /// Live input levels, captured by `read`.
    pub inputs: u64,
    image: u64,
    pub reads: u32,
    /// Simulated duration of one input cascade read.
    pub read_cost_us: u64,
    staged: u64,
    /// Every latched output frame, oldest first.
    pub frames: Vec<u64>,
    /// Clock reading when each frame finished latching.
    pub latch_us: Vec<u64>,
    /// Simulated duration of one output cascade latch.
    pub write_cost_us: u64,
    pub relays: HashMap<u8, bool>,
    pub relay_writes: Vec<(u8, bool)>,
    pub adc: [u16; 8],
}

#[allow(dead_code)]
impl MockPanel {
    pub fn new() -> Self {
        Self {
            clock: SharedClock::default(),
            inputs: 0,
            image: 0,
            reads: 0,
            read_cost_us: 0,
            staged: 0,
            frames: Vec::new(),
            latch_us: Vec::new(),
            write_cost_us: 0,
            relays: HashMap::new(),
            relay_writes: Vec::new(),
            adc: [0; 8],
        }
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay {
            clock: self.clock.clone(),
            slept_us: 0,
        }
    }

    pub fn set_input(&mut self, bit: u8, high: bool) {
        if high {
            self.inputs |= 1 << bit;
        } else {
            self.inputs &= !(1 << bit);
        }
    }

    pub fn relay(&self, pin: u8) -> Option<bool> {
        self.relays.get(&pin).copied()
    }

    pub fn last_frame(&self) -> u64 {
        self.frames.last().copied().unwrap_or(0)
    }
}

impl Default for MockPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for MockPanel {
    fn millis(&self) -> u32 {
        (self.clock.0.get() / 1000) as u32
    }

    fn micros(&self) -> u32 {
        self.clock.0.get() as u32
    }
}

impl InputCascade for MockPanel {
    fn read(&mut self) {
        self.clock.advance_us(self.read_cost_us);
        self.image = self.inputs;
        self.reads += 1;
    }

    fn get(&self, bit: u8) -> bool {
        bit < 64 && self.image & (1 << bit) != 0
    }
}

impl OutputCascade for MockPanel {
    fn set(&mut self, bit: u8, on: bool) {
        if bit >= 64 {
            return;
        }
        if on {
            self.staged |= 1 << bit;
        } else {
            self.staged &= !(1 << bit);
        }
    }

    fn write(&mut self) {
        self.clock.advance_us(self.write_cost_us);
        self.frames.push(self.staged);
        self.latch_us.push(self.clock.0.get());
    }
}

impl RelayPort for MockPanel {
    fn drive(&mut self, pin: u8, high: bool) {
        self.relays.insert(pin, high);
        self.relay_writes.push((pin, high));
    }
}

impl ControlPort for MockPanel {
    fn sample(&mut self, channel: u8) -> u16 {
        self.adc.get(usize::from(channel)).copied().unwrap_or(0)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<AppEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Bench configuration ───────────────────────────────────────

/// House tables without arming controls or boot lamp test, tracing every
/// sensor change.
#[allow(dead_code)]
pub fn bench_config() -> zoneguard::config::SystemConfig {
    let mut config = zoneguard::config::SystemConfig::default();
    config.controls.clear();
    config.boot_lamp_test_secs = 0;
    config.trace = zoneguard::config::TraceLevel::Sensors;
    config
}
