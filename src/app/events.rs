//! Outbound application events.
//!
//! The [`ScanEngine`](super::service::ScanEngine) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Every event carries the
//! millisecond clock reading of the scan that produced it.

use crate::sensors::SensorId;
use crate::zones::ZoneId;

/// Structured events emitted by the scan core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The engine finished construction.
    Started { sensors: u8, zones: u8 },

    /// A sensor committed a new debounced status.
    SensorChanged {
        sensor: SensorId,
        abnormal: bool,
        at_ms: u32,
    },

    /// A zone was armed or disarmed.
    ZoneArmed { zone: ZoneId, armed: bool, at_ms: u32 },

    /// A zone relay tripped.
    ZoneTriggered { zone: ZoneId, at_ms: u32 },

    /// A zone relay returned to normal.
    ZoneCleared { zone: ZoneId, at_ms: u32 },

    /// The lamp test started (`running = true`) or finished.
    LampTest { running: bool, at_ms: u32 },
}
