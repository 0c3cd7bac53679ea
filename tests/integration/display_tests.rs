//! Indicator multiplexing and lamp test, observed on the output cascade.
//!
//! Every blocking tick latches exactly four frames: red phase, gap,
//! green phase, gap.

use zoneguard::app::commands::AppCommand;
use zoneguard::app::events::AppEvent;
use zoneguard::app::service::ScanEngine;
use zoneguard::config::{LedConfig, SystemConfig};
use zoneguard::zones::ZoneId;

use crate::mock_hw::{MockPanel, RecordingSink, bench_config};

/// Red lamp bits of the house table (sensor `i` → bit `2i`).
const ALL_RED: u64 = 0x5555_5555_5555_5555;
/// Green lamp bits (sensor `i` → bit `2i + 1`).
const ALL_GREEN: u64 = 0xAAAA_AAAA_AAAA_AAAA;
/// Green lamps of sensors with a wired input (all but the key tamper).
const WIRED_GREEN: u64 = ALL_GREEN & !(1 << 63);

fn started(config: &SystemConfig) -> (ScanEngine, MockPanel, RecordingSink) {
    let mut engine = ScanEngine::new(config).unwrap();
    let mut panel = MockPanel::new();
    let mut sink = RecordingSink::new();
    engine.start(&mut panel, &mut sink);
    (engine, panel, sink)
}

/// One blocking tick at `ms`; returns the four latched frames.
fn tick_at(engine: &mut ScanEngine, panel: &mut MockPanel, sink: &mut RecordingSink, ms: u64) -> [u64; 4] {
    panel.clock.set_ms(ms);
    panel.frames.clear();
    let mut delay = panel.delay();
    engine.run_tick(panel, &mut delay, sink);
    assert_eq!(panel.frames.len(), 4, "frames at {ms} ms: {:x?}", panel.frames);
    [panel.frames[0], panel.frames[1], panel.frames[2], panel.frames[3]]
}

// ── Multiplexing ──────────────────────────────────────────────

#[test]
fn idle_panel_shows_steady_green() {
    let (mut engine, mut panel, mut sink) = started(&bench_config());
    let frames = tick_at(&mut engine, &mut panel, &mut sink, 0);
    assert_eq!(frames, [0, 0, WIRED_GREEN, 0]);
}

#[test]
fn cascade_is_dark_between_every_phase() {
    let (mut engine, mut panel, mut sink) = started(&bench_config());
    engine.handle_command(
        AppCommand::Arm {
            zone: ZoneId::new(1).unwrap(),
            armed: true,
        },
        &mut panel,
        &mut sink,
    );
    panel.set_input(0, true); // armed: red
    panel.set_input(2, true); // disarmed: yellow

    let mut delay = panel.delay();
    for _ in 0..20 {
        engine.run_tick(&mut panel, &mut delay, &mut sink);
    }
    for cycle in panel.frames.chunks(4) {
        assert_eq!(cycle[1], 0);
        assert_eq!(cycle[3], 0);
        assert_eq!(cycle[0] & ALL_GREEN, 0, "green lit in red phase");
        assert_eq!(cycle[2] & ALL_RED, 0, "red lit in green phase");
    }
}

#[test]
fn yellow_lights_both_phases() {
    let (mut engine, mut panel, mut sink) = started(&bench_config());
    panel.set_input(2, true); // shop door, zone disarmed
    let [red, _, green, _] = tick_at(&mut engine, &mut panel, &mut sink, 0);
    assert_eq!(red, 1 << 4);
    assert_ne!(green & (1 << 5), 0);
}

#[test]
fn triggered_lamp_blinks_fast() {
    let (mut engine, mut panel, mut sink) = started(&bench_config());
    engine.handle_command(AppCommand::ArmAll(true), &mut panel, &mut sink);
    panel.set_input(0, true);

    let [red, _, green, _] = tick_at(&mut engine, &mut panel, &mut sink, 0);
    assert_eq!(red, 1);
    assert_eq!(green & 0b11, 0);

    // Fast blink (250 ms): dark during the odd period.
    let [red, _, _, _] = tick_at(&mut engine, &mut panel, &mut sink, 300);
    assert_eq!(red, 0);
    let [red, _, _, _] = tick_at(&mut engine, &mut panel, &mut sink, 510);
    assert_eq!(red, 1);
}

#[test]
fn blocking_tick_sleeps_through_every_hold() {
    let (mut engine, mut panel, mut sink) = started(&bench_config());
    let mut delay = panel.delay();
    engine.run_tick(&mut panel, &mut delay, &mut sink);
    // 100 red + 25 gap + 100 green + 25 gap.
    assert_eq!(delay.slept_us, 250);
    assert!(engine.mux().is_idle());
}

#[test]
fn slow_cascade_io_never_shortens_a_phase() {
    let (mut engine, mut panel, mut sink) = started(&bench_config());
    panel.read_cost_us = 150;
    panel.write_cost_us = 20;
    panel.set_input(2, true); // yellow: lit in both phases

    let mut delay = panel.delay();
    engine.run_tick(&mut panel, &mut delay, &mut sink);

    assert_eq!(panel.frames.len(), 4);
    assert_ne!(panel.frames[0] & (1 << 4), 0);
    assert_ne!(panel.frames[2] & (1 << 5), 0);

    let leds = LedConfig::default();
    let t = &panel.latch_us;
    let red_lit = t[1] - t[0];
    let green_lit = t[3] - t[2];
    assert!(red_lit >= u64::from(leds.red_hold_us), "red lit {red_lit} us");
    assert!(t[2] - t[1] >= u64::from(leds.off_hold_us / 2));
    assert!(green_lit >= u64::from(leds.green_hold_us), "green lit {green_lit} us");
}

// ── Lamp test ─────────────────────────────────────────────────

#[test]
fn boot_lamp_test_cycles_then_hands_back() {
    let mut config = bench_config();
    config.boot_lamp_test_secs = 8;
    let (mut engine, mut panel, mut sink) = started(&config);

    assert_eq!(tick_at(&mut engine, &mut panel, &mut sink, 0), [0, 0, 0, 0]);
    assert_eq!(tick_at(&mut engine, &mut panel, &mut sink, 1_000), [ALL_RED, 0, 0, 0]);
    assert_eq!(tick_at(&mut engine, &mut panel, &mut sink, 2_000), [0, 0, ALL_GREEN, 0]);
    assert_eq!(
        tick_at(&mut engine, &mut panel, &mut sink, 3_000),
        [ALL_RED, 0, ALL_GREEN, 0]
    );
    assert_eq!(tick_at(&mut engine, &mut panel, &mut sink, 7_999), [ALL_RED, 0, ALL_GREEN, 0]);
    assert!(engine.lamp_test_running());

    sink.take();
    assert_eq!(tick_at(&mut engine, &mut panel, &mut sink, 8_000), [0, 0, WIRED_GREEN, 0]);
    assert!(!engine.lamp_test_running());
    assert_eq!(sink.events, vec![AppEvent::LampTest { running: false, at_ms: 8_000 }]);
}

#[test]
fn lamp_test_overrides_display_but_not_sensor_state() {
    let mut config = bench_config();
    config.boot_lamp_test_secs = 8;
    let (mut engine, mut panel, mut sink) = started(&config);
    panel.set_input(2, true);
    tick_at(&mut engine, &mut panel, &mut sink, 1_000);
    assert!(engine.sensors().abnormal(zoneguard::sensors::SensorId(2)));
    assert_eq!(
        engine.sensors().color(zoneguard::sensors::SensorId(2)),
        zoneguard::indicators::LedColor::Yellow
    );
}

#[test]
fn forced_lamp_test_after_completion_runs_long_cycle() {
    let mut config = bench_config();
    config.boot_lamp_test_secs = 2;
    let (mut engine, mut panel, mut sink) = started(&config);
    tick_at(&mut engine, &mut panel, &mut sink, 0);
    tick_at(&mut engine, &mut panel, &mut sink, 2_000);
    assert!(!engine.lamp_test_running());
    sink.take();

    panel.clock.set_ms(10_000);
    engine.handle_command(AppCommand::LampTest, &mut panel, &mut sink);
    assert_eq!(sink.take(), vec![AppEvent::LampTest { running: true, at_ms: 10_000 }]);

    let t0 = 10_000;
    assert_eq!(tick_at(&mut engine, &mut panel, &mut sink, t0), [0, 0, 0, 0]);
    assert_eq!(tick_at(&mut engine, &mut panel, &mut sink, t0 + 1_000), [ALL_RED, 0, 0, 0]);
    assert_eq!(tick_at(&mut engine, &mut panel, &mut sink, t0 + 2_000), [0, 0, ALL_GREEN, 0]);
    assert_eq!(
        tick_at(&mut engine, &mut panel, &mut sink, t0 + 3_000),
        [ALL_RED, 0, ALL_GREEN, 0]
    );
    assert_eq!(tick_at(&mut engine, &mut panel, &mut sink, t0 + 4_000), [0, 0, 0, 0]);
    // Forced runs last 60 s.
    tick_at(&mut engine, &mut panel, &mut sink, t0 + 59_999);
    assert!(engine.lamp_test_running());
    tick_at(&mut engine, &mut panel, &mut sink, t0 + 60_000);
    assert!(!engine.lamp_test_running());
}

#[test]
fn forcing_during_boot_test_is_ignored() {
    let config = SystemConfig {
        controls: heapless::Vec::new(),
        ..SystemConfig::default()
    };
    let (mut engine, mut panel, mut sink) = started(&config);
    tick_at(&mut engine, &mut panel, &mut sink, 0);
    sink.take();
    engine.handle_command(AppCommand::LampTest, &mut panel, &mut sink);
    assert!(sink.events.is_empty());
    tick_at(&mut engine, &mut panel, &mut sink, 8_000);
    assert!(!engine.lamp_test_running());
}
