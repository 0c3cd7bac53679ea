//! Sensor debounce, trigger latch and indicator policy.
//!
//! ```text
//!   InputCascade ──▶ normalise ──▶ debounce ──▶ committed status
//!                                                   │
//!                        ZoneEngine::set ◀──────────┤
//!                        trigger latch   ◀──────────┤ (zone armed)
//!                        LedRequest      ◀──────────┘
//! ```
//!
//! Each sensor is sampled once per scan.  A changed raw level must hold for
//! `debounce_ticks` further scans before the committed status follows it.
//! While a sensor is still settling, its zone keeps seeing the previously
//! committed status.
//!
//! The trigger latch is sticky: once a sensor has been abnormal while its
//! zone was armed, the lamp keeps showing it until [`SensorEngine::reset`]
//! or the zone is re-armed.

pub mod state;

use core::fmt;

use heapless::Vec;
use log::{debug, trace};

use crate::app::context::ScanContext;
use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, InputCascade};
use crate::config::{MAX_SENSORS, SensorConfig, SystemConfig, TraceLevel};
use crate::indicators::mux::Lamp;
use crate::indicators::{BlinkRate, LedColor, LedRequest};
use crate::zones::{ZoneEngine, ZoneId};

pub use state::{PackedSensorState, SensorState};

/// Position in the sensor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SensorId(pub u8);

impl SensorId {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sensor {}", self.0)
    }
}

/// Where a sensor is in its debounce cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorPhase {
    /// Not wired to the input cascade (or not in the table).
    Unconfigured,
    StableNormal,
    /// A changed raw level is waiting out its debounce delay.
    Debouncing,
    StableAbnormal,
}

pub struct SensorEngine {
    sensors: Vec<SensorConfig, MAX_SENSORS>,
    states: Vec<SensorState, MAX_SENSORS>,
}

impl SensorEngine {
    /// Every sensor starts normal; wired ones show steady green.
    pub fn new(config: &SystemConfig) -> Self {
        let mut states = Vec::new();
        for s in &config.sensors {
            let request = if s.input_bit().is_some() {
                LedRequest::steady(LedColor::Green)
            } else {
                LedRequest::OFF
            };
            // Same capacity as `sensors`, so this cannot overflow.
            let _ = states.push(SensorState {
                request,
                ..SensorState::default()
            });
        }
        Self {
            sensors: config.sensors.clone(),
            states,
        }
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SensorId> + use<> {
        (0..self.sensors.len() as u8).map(SensorId)
    }

    /// Sample every wired sensor from the last cascade read.
    ///
    /// Abnormal sensors are reported to their zone, armed zones latch the
    /// sensor's trigger, and every lamp request is recomputed.  Committed
    /// status changes are logged and, at [`TraceLevel::Sensors`], emitted.
    pub fn sample(
        &mut self,
        ctx: &ScanContext,
        inputs: &impl InputCascade,
        zones: &mut ZoneEngine,
        sink: &mut impl EventSink,
    ) {
        for (i, (cfg, state)) in self.sensors.iter().zip(self.states.iter_mut()).enumerate() {
            let Some(bit) = cfg.input_bit() else {
                state.request = LedRequest::OFF;
                continue;
            };

            let zone = zones.id(cfg.zone);
            let armed = zone.is_some_and(|z| zones.armed(z));
            let raw_abnormal = inputs.get(bit) != cfg.normally_high;

            if let Some(abnormal) = state.debounce(raw_abnormal, cfg.debounce_ticks) {
                let sensor = SensorId(i as u8);
                debug!(
                    "{sensor}: {} at {} ms",
                    if abnormal { "abnormal" } else { "normal" },
                    ctx.now_ms
                );
                if ctx.traces(TraceLevel::Sensors) {
                    sink.emit(&AppEvent::SensorChanged {
                        sensor,
                        abnormal,
                        at_ms: ctx.now_ms,
                    });
                }
            } else if state.is_debouncing() {
                trace!("sensor {i}: settling, {} scans left", state.countdown);
            }

            if state.abnormal {
                if let Some(z) = zone {
                    zones.set(ctx.now_ms, z, false);
                }
                if armed {
                    state.triggered = true;
                }
            }

            state.request = indication(state, armed);
        }
    }

    /// Clear one sensor's trigger latch.  The lamp follows on the next
    /// [`sample`](Self::sample).
    pub fn reset(&mut self, id: SensorId) {
        if let Some(state) = self.states.get_mut(id.index()) {
            state.triggered = false;
        }
    }

    /// Clear the trigger latch of every sensor in `zone`.
    pub fn reset_zone(&mut self, zone: ZoneId) {
        for (cfg, state) in self.sensors.iter().zip(self.states.iter_mut()) {
            if cfg.zone == zone.number() {
                state.triggered = false;
            }
        }
    }

    // ── queries ──────────────────────────────────────────────────

    pub fn triggered(&self, id: SensorId) -> bool {
        self.state(id).is_some_and(|s| s.triggered)
    }

    /// Committed (debounced) status.
    pub fn abnormal(&self, id: SensorId) -> bool {
        self.state(id).is_some_and(|s| s.abnormal)
    }

    pub fn request(&self, id: SensorId) -> LedRequest {
        self.state(id).map_or(LedRequest::OFF, |s| s.request)
    }

    pub fn color(&self, id: SensorId) -> LedColor {
        self.request(id).color
    }

    pub fn blink(&self, id: SensorId) -> BlinkRate {
        self.request(id).blink
    }

    pub fn phase(&self, id: SensorId) -> SensorPhase {
        match (self.config(id), self.state(id)) {
            (Some(cfg), Some(state)) if cfg.input_bit().is_some() => {
                if state.is_debouncing() {
                    SensorPhase::Debouncing
                } else if state.abnormal {
                    SensorPhase::StableAbnormal
                } else {
                    SensorPhase::StableNormal
                }
            }
            _ => SensorPhase::Unconfigured,
        }
    }

    pub fn state(&self, id: SensorId) -> Option<&SensorState> {
        self.states.get(id.index())
    }

    pub fn packed(&self, id: SensorId) -> Option<PackedSensorState> {
        self.state(id).map(|s| PackedSensorState::from(*s))
    }

    pub fn config(&self, id: SensorId) -> Option<&SensorConfig> {
        self.sensors.get(id.index())
    }

    /// Lamp wiring and current request of every sensor, in table order.
    pub fn lamps(&self) -> impl Iterator<Item = Lamp> + '_ {
        self.sensors.iter().zip(self.states.iter()).map(|(cfg, state)| Lamp {
            red: cfg.red_bit(),
            green: cfg.green_bit(),
            request: state.request,
        })
    }
}

/// Lamp policy, first match wins:
///
/// | condition                        | lamp          |
/// |----------------------------------|---------------|
/// | triggered, zone armed            | red, fast     |
/// | abnormal, zone disarmed          | yellow        |
/// | triggered, zone disarmed, normal | green, slow   |
/// | otherwise                        | green         |
///
/// An abnormal sensor in an armed zone has always latched by the time this
/// runs, so it falls under the first row.
fn indication(state: &SensorState, armed: bool) -> LedRequest {
    match (state.triggered, state.abnormal, armed) {
        (true, _, true) => LedRequest::blinking(LedColor::Red, BlinkRate::Fast),
        (_, true, false) => LedRequest::steady(LedColor::Yellow),
        (true, false, false) => LedRequest::blinking(LedColor::Green, BlinkRate::Slow),
        _ => LedRequest::steady(LedColor::Green),
    }
}
