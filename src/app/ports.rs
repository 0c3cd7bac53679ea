//! Port traits — the hexagonal boundary between the scan core and the
//! panel hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ScanEngine (domain)
//! ```
//!
//! Driven adapters (shift cascades, relays, clock, control inputs, event
//! sinks) implement these traits.  The [`ScanEngine`](super::service::ScanEngine)
//! consumes them via generics, so the domain core never touches GPIO
//! directly and every scan can be replayed on the host against mocks.
//!
//! Port methods are infallible: adapters own their I/O failures (log and
//! retain the last good value) so a flaky line never stalls the scan.

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Free-running counters.  Both wrap at 2^32.
pub trait ClockPort {
    /// Milliseconds since boot.
    fn millis(&self) -> u32;

    /// Microseconds since boot.
    fn micros(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Shift cascades
// ───────────────────────────────────────────────────────────────

/// Serial-in sensor cascade.
pub trait InputCascade {
    /// Latch the current level of every input into the read image.
    fn read(&mut self);

    /// Level of one bit from the last [`read`](Self::read).
    /// Out-of-range bits read as `false`.
    fn get(&self, bit: u8) -> bool;
}

/// Serial-out indicator cascade.
pub trait OutputCascade {
    /// Stage one bit.  Nothing changes on the outputs until
    /// [`write`](Self::write).
    fn set(&mut self, bit: u8, on: bool);

    /// Atomically latch every staged bit to the physical outputs.
    fn write(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Relays
// ───────────────────────────────────────────────────────────────

/// Zone alarm relay outputs.
pub trait RelayPort {
    /// Drive the relay on `pin` to the given level.
    fn drive(&mut self, pin: u8, high: bool);
}

// ───────────────────────────────────────────────────────────────
// Control inputs
// ───────────────────────────────────────────────────────────────

/// Analog arming inputs (key switches, panel toggles).
pub trait ControlPort {
    /// Raw ADC reading of one channel.
    fn sample(&mut self, channel: u8) -> u16;
}

/// Everything one display-and-scan cycle touches.
pub trait PanelPort: ClockPort + InputCascade + OutputCascade + RelayPort + ControlPort {}

impl<T: ClockPort + InputCascade + OutputCascade + RelayPort + ControlPort> PanelPort for T {}

// ───────────────────────────────────────────────────────────────
// Event sink
// ───────────────────────────────────────────────────────────────

/// The engine emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log,
/// a recording buffer in tests, ...).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &super::events::AppEvent) {}
}
