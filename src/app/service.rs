//! Scan engine: the hexagonal core.
//!
//! [`ScanEngine`] owns the sensor, zone and indicator state and runs one
//! scan per display cycle.  All I/O flows through port traits injected at
//! call sites, so the engine runs unchanged against mock adapters.
//!
//! ```text
//!  ControlPort  ──▶ ┌──────────────────────────────┐
//!  InputCascade ──▶ │          ScanEngine          │ ──▶ RelayPort
//!  ClockPort    ──▶ │ Sensors · Zones · Lamp test  │ ──▶ OutputCascade
//!                   └──────────────────────────────┘ ──▶ EventSink
//! ```
//!
//! One tick:
//!
//! 1. sample the arming controls,
//! 2. read the input cascade and debounce every sensor,
//! 3. resolve zone triggers and drive the relays,
//! 4. run one red/green display cycle on the output cascade.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::config::{SystemConfig, TraceLevel};
use crate::controls::ControlDecoder;
use crate::error::Result;
use crate::indicators::LedRequest;
use crate::indicators::lamp_test::LampTest;
use crate::indicators::mux::{Lamp, LedMux, MuxPoll};
use crate::sensors::SensorEngine;
use crate::zones::{ZoneEdges, ZoneEngine, ZoneId};

use super::commands::AppCommand;
use super::context::ScanContext;
use super::events::AppEvent;
use super::ports::{
    ClockPort, ControlPort, EventSink, InputCascade, OutputCascade, PanelPort, RelayPort,
};

// ───────────────────────────────────────────────────────────────
// ScanEngine
// ───────────────────────────────────────────────────────────────

pub struct ScanEngine {
    sensors: SensorEngine,
    zones: ZoneEngine,
    mux: LedMux,
    lamp_test: LampTest,
    controls: ControlDecoder,
    trace: TraceLevel,
    scans: u32,
}

impl ScanEngine {
    /// Build the engine from a validated configuration.  Every zone starts
    /// disarmed and the boot lamp test is pending.
    pub fn new(config: &SystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sensors: SensorEngine::new(config),
            zones: ZoneEngine::new(config),
            mux: LedMux::new(config.leds),
            lamp_test: LampTest::new(config.boot_lamp_test_secs, config.forced_lamp_test_secs),
            controls: ControlDecoder::new(&config.controls),
            trace: config.trace,
            scans: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put every relay at its normal level and announce the engine.
    pub fn start(&mut self, hw: &mut (impl ClockPort + RelayPort), sink: &mut impl EventSink) {
        self.zones.write_relays(hw);
        sink.emit(&AppEvent::Started {
            sensors: self.sensors.len() as u8,
            zones: self.zones.len() as u8,
        });
        if self.lamp_test.is_running() && self.trace >= TraceLevel::Arming {
            sink.emit(&AppEvent::LampTest {
                running: true,
                at_ms: hw.millis(),
            });
        }
        info!(
            "scan engine started: {} sensors, {} zones, {} controls",
            self.sensors.len(),
            self.zones.len(),
            self.controls.len()
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one scan: controls, inputs, sensors, zones and relays.
    /// The display is not touched.
    pub fn scan(
        &mut self,
        hw: &mut (impl ClockPort + InputCascade + RelayPort + ControlPort),
        sink: &mut impl EventSink,
    ) -> ScanContext {
        let ctx = self.context(&*hw);
        self.scans = self.scans.wrapping_add(1);

        self.apply_controls(&ctx, hw, sink);

        self.zones.reset_all();
        hw.read();
        self.sensors.sample(&ctx, &*hw, &mut self.zones, sink);

        let edges = self.zones.update(ctx.now_ms, hw);
        self.report_edges(&ctx, edges, sink);
        ctx
    }

    /// Start a display cycle for the state left by the last scan.
    pub fn show(
        &mut self,
        ctx: &ScanContext,
        out: &mut (impl OutputCascade + ClockPort),
        sink: &mut impl EventSink,
    ) {
        let was_running = self.lamp_test.is_running();
        let test = self.lamp_test.step(ctx.now_ms);

        if was_running && test.is_none() && ctx.traces(TraceLevel::Arming) {
            sink.emit(&AppEvent::LampTest {
                running: false,
                at_ms: ctx.now_ms,
            });
        }

        match test {
            Some(color) => {
                let lamps = self.sensors.lamps().map(|lamp| Lamp {
                    request: LedRequest::steady(color),
                    ..lamp
                });
                self.mux.begin(ctx.now_ms, lamps, out);
            }
            None => self.mux.begin(ctx.now_ms, self.sensors.lamps(), out),
        }
    }

    /// Non-blocking tick.  Starts a scan and display cycle when the
    /// previous one has finished, then advances the display as far as the
    /// clock allows.  Call again after `remaining_us` on [`MuxPoll::Hold`].
    pub fn poll(&mut self, hw: &mut impl PanelPort, sink: &mut impl EventSink) -> MuxPoll {
        if self.mux.is_idle() {
            let ctx = self.scan(hw, sink);
            self.show(&ctx, hw, sink);
        }
        self.mux.poll(hw)
    }

    /// Blocking tick: one scan followed by one complete display cycle,
    /// sleeping through the phase holds on `delay`.
    pub fn run_tick(
        &mut self,
        hw: &mut impl PanelPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> ScanContext {
        let ctx = self.scan(hw, sink);
        self.show(&ctx, hw, sink);
        loop {
            match self.mux.poll(hw) {
                MuxPoll::Hold { remaining_us } => delay.delay_us(remaining_us),
                MuxPoll::Done => break,
            }
        }
        ctx
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an external command between ticks.  Arming changes drive the
    /// relays immediately.
    ///
    /// When arming controls are configured they are re-sampled every scan
    /// and take precedence over [`AppCommand::Arm`].
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut (impl ClockPort + RelayPort),
        sink: &mut impl EventSink,
    ) {
        let ctx = self.context(&*hw);
        match cmd {
            AppCommand::Arm { zone, armed } => {
                self.set_armed(&ctx, zone, armed, sink);
                self.zones.write_relays(hw);
            }
            AppCommand::ArmAll(armed) => {
                for zone in self.zones.ids() {
                    self.set_armed(&ctx, zone, armed, sink);
                }
                self.zones.write_relays(hw);
            }
            AppCommand::ResetSensor(id) => {
                debug!("{id}: trigger reset");
                self.sensors.reset(id);
            }
            AppCommand::LampTest => {
                if self.lamp_test.force() && ctx.traces(TraceLevel::Arming) {
                    sink.emit(&AppEvent::LampTest {
                        running: true,
                        at_ms: ctx.now_ms,
                    });
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn sensors(&self) -> &SensorEngine {
        &self.sensors
    }

    pub fn zones(&self) -> &ZoneEngine {
        &self.zones
    }

    pub fn mux(&self) -> &LedMux {
        &self.mux
    }

    pub fn lamp_test_running(&self) -> bool {
        self.lamp_test.is_running()
    }

    /// Scans started since construction (wraps).
    pub fn scans(&self) -> u32 {
        self.scans
    }

    pub fn trace(&self) -> TraceLevel {
        self.trace
    }

    pub fn set_trace(&mut self, trace: TraceLevel) {
        self.trace = trace;
    }

    // ── Internal ──────────────────────────────────────────────

    fn context(&self, clock: &impl ClockPort) -> ScanContext {
        ScanContext::new(clock.millis(), clock.micros(), self.scans, self.trace)
    }

    /// Arm or disarm one zone; a fresh arm clears the zone's sensor
    /// trigger latches.
    fn set_armed(
        &mut self,
        ctx: &ScanContext,
        zone: ZoneId,
        armed: bool,
        sink: &mut impl EventSink,
    ) {
        if !self.zones.arm(zone, armed) {
            return;
        }
        if armed {
            self.sensors.reset_zone(zone);
        }
        if ctx.traces(TraceLevel::Arming) {
            sink.emit(&AppEvent::ZoneArmed {
                zone,
                armed,
                at_ms: ctx.now_ms,
            });
        }
    }

    fn apply_controls(
        &mut self,
        ctx: &ScanContext,
        hw: &mut impl ControlPort,
        sink: &mut impl EventSink,
    ) {
        if self.controls.is_empty() {
            return;
        }
        let mask = self.controls.decode(hw);
        for (i, zone) in self.zones.ids().enumerate().take(self.controls.len()) {
            self.set_armed(ctx, zone, mask & (1 << i) != 0, sink);
        }
    }

    fn report_edges(&self, ctx: &ScanContext, edges: ZoneEdges, sink: &mut impl EventSink) {
        if edges.is_empty() || !ctx.traces(TraceLevel::Arming) {
            return;
        }
        for zone in self.zones.ids() {
            let mask = 1u8 << zone.index();
            if edges.raised & mask != 0 {
                sink.emit(&AppEvent::ZoneTriggered {
                    zone,
                    at_ms: ctx.now_ms,
                });
            }
            if edges.cleared & mask != 0 {
                sink.emit(&AppEvent::ZoneCleared {
                    zone,
                    at_ms: ctx.now_ms,
                });
            }
        }
    }
}
