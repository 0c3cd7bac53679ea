//! Hardware adapter: bridges the panel drivers to the domain port traits.
//!
//! Owns the input and output cascades, the relay bank, the control ADC and
//! the clock, and exposes them through the port traits the
//! [`ScanEngine`](crate::app::service::ScanEngine) consumes.  This is the
//! only place the firmware binary assembles real peripherals; on host
//! targets the same adapter wraps simulated drivers.

use crate::app::ports::{ClockPort, ControlPort, InputCascade, OutputCascade, RelayPort};

/// Concrete adapter that combines all panel hardware behind port traits.
pub struct HardwareAdapter<I, O, R, C, K> {
    inputs: I,
    outputs: O,
    relays: R,
    controls: C,
    clock: K,
}

impl<I, O, R, C, K> HardwareAdapter<I, O, R, C, K> {
    pub fn new(inputs: I, outputs: O, relays: R, controls: C, clock: K) -> Self {
        Self {
            inputs,
            outputs,
            relays,
            controls,
            clock,
        }
    }

    pub fn relays(&self) -> &R {
        &self.relays
    }
}

// ── ClockPort ─────────────────────────────────────────────────

impl<I, O, R, C, K: ClockPort> ClockPort for HardwareAdapter<I, O, R, C, K> {
    fn millis(&self) -> u32 {
        self.clock.millis()
    }

    fn micros(&self) -> u32 {
        self.clock.micros()
    }
}

// ── Cascades ──────────────────────────────────────────────────

impl<I: InputCascade, O, R, C, K> InputCascade for HardwareAdapter<I, O, R, C, K> {
    fn read(&mut self) {
        self.inputs.read();
    }

    fn get(&self, bit: u8) -> bool {
        self.inputs.get(bit)
    }
}

impl<I, O: OutputCascade, R, C, K> OutputCascade for HardwareAdapter<I, O, R, C, K> {
    fn set(&mut self, bit: u8, on: bool) {
        self.outputs.set(bit, on);
    }

    fn write(&mut self) {
        self.outputs.write();
    }
}

// ── Relays and controls ───────────────────────────────────────

impl<I, O, R: RelayPort, C, K> RelayPort for HardwareAdapter<I, O, R, C, K> {
    fn drive(&mut self, pin: u8, high: bool) {
        self.relays.drive(pin, high);
    }
}

impl<I, O, R, C: ControlPort, K> ControlPort for HardwareAdapter<I, O, R, C, K> {
    fn sample(&mut self, channel: u8) -> u16 {
        self.controls.sample(channel)
    }
}
