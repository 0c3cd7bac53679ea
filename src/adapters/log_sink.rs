//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! console line (UART / USB-CDC in production), stamped with the scan
//! clock as `HH:MM:SS.mmm` since boot.

use core::fmt;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Uptime stamp in `HH:MM:SS.mmm`.  Hours roll over with the `u32` clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp(pub u32);

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.0 % 1000;
        let secs = self.0 / 1000;
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            secs / 3600,
            secs / 60 % 60,
            secs % 60,
            ms
        )
    }
}

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match *event {
            AppEvent::Started { sensors, zones } => {
                info!("START | sensors={sensors} zones={zones}");
            }
            AppEvent::SensorChanged {
                sensor,
                abnormal,
                at_ms,
            } => {
                info!(
                    "{} SENSOR | {} {}",
                    Stamp(at_ms),
                    sensor.0,
                    if abnormal { "ABNORMAL" } else { "normal" }
                );
            }
            AppEvent::ZoneArmed { zone, armed, at_ms } => {
                info!(
                    "{} ARM | zone {} {}",
                    Stamp(at_ms),
                    zone.number(),
                    if armed { "armed" } else { "disarmed" }
                );
            }
            AppEvent::ZoneTriggered { zone, at_ms } => {
                warn!("{} ALARM | zone {} triggered", Stamp(at_ms), zone.number());
            }
            AppEvent::ZoneCleared { zone, at_ms } => {
                info!("{} ALARM | zone {} cleared", Stamp(at_ms), zone.number());
            }
            AppEvent::LampTest { running, at_ms } => {
                info!(
                    "{} LAMP | test {}",
                    Stamp(at_ms),
                    if running { "started" } else { "finished" }
                );
            }
        }
    }
}
