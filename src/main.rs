//! ZoneGuard firmware — main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                     │
//! │                                                            │
//! │  HardwareAdapter                 LogEventSink  SystemClock │
//! │  ShiftIn · ShiftOut · RelayBank  (EventSink)   (ClockPort) │
//! │  Adc1Controls                                              │
//! │                                                            │
//! │  ──────────────── Port Trait Boundary ───────────────      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │            ScanEngine (pure logic)               │      │
//! │  │  Sensors · Zones · LedMux · Lamp test            │      │
//! │  └──────────────────────────────────────────────────┘      │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, Output, PinDriver};
use log::{info, warn};

use zoneguard::adapters::hardware::HardwareAdapter;
use zoneguard::adapters::log_sink::LogEventSink;
use zoneguard::adapters::time::SystemClock;
use zoneguard::app::service::ScanEngine;
use zoneguard::config::SystemConfig;
use zoneguard::drivers::hw_init::{self, Adc1Controls};
use zoneguard::drivers::relay::RelayBank;
use zoneguard::drivers::shift::{ShiftIn, ShiftOut};

/// Scans between voluntary yields to the FreeRTOS idle task.
const YIELD_EVERY_SCANS: u32 = 200;

fn output(gpio: u8) -> Result<PinDriver<'static, AnyOutputPin, Output>> {
    // SAFETY: every GPIO number comes from the validated configuration and
    // is claimed exactly once below.
    let pin = unsafe { AnyOutputPin::new(i32::from(gpio)) };
    Ok(PinDriver::output(pin)?)
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  ZoneGuard v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    let mut engine = ScanEngine::new(&config).map_err(|e| anyhow!("config rejected: {e}"))?;

    // ── 3. Peripherals ────────────────────────────────────────
    let channels: heapless::Vec<u8, 8> = config.controls.iter().map(|c| c.channel).collect();
    if let Err(e) = hw_init::init_control_adc(&channels) {
        warn!("control ADC unavailable ({e}), zones stay disarmed");
    }

    // SAFETY: input data GPIO is claimed once, from the validated config.
    let in_data = PinDriver::input(unsafe { AnyInputPin::new(i32::from(config.input.data)) })?;
    let inputs = ShiftIn::new(
        in_data,
        output(config.input.clock)?,
        output(config.input.latch)?,
        config.input.registers,
    );
    let outputs = ShiftOut::new(
        output(config.output.data)?,
        output(config.output.clock)?,
        output(config.output.latch)?,
        config.output.registers,
    );

    let mut relays = RelayBank::new();
    for zone in &config.zones {
        if relays.add(zone.relay_pin, output(zone.relay_pin)?).is_err() {
            return Err(anyhow!("relay bank full at GPIO {}", zone.relay_pin));
        }
    }

    let mut hw = HardwareAdapter::new(inputs, outputs, relays, Adc1Controls, SystemClock::new());
    let mut sink = LogEventSink::new();
    let mut delay = Ets;

    // ── 4. Scan loop ──────────────────────────────────────────
    engine.start(&mut hw, &mut sink);
    loop {
        let ctx = engine.run_tick(&mut hw, &mut delay, &mut sink);
        if ctx.scan % YIELD_EVERY_SCANS == 0 {
            FreeRtos::delay_ms(1);
        }
    }
}
