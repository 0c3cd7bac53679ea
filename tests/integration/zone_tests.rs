//! Zone relay behaviour through the full scan engine: minimum dwell,
//! disarm, re-arm and clock wrap.

use zoneguard::app::commands::AppCommand;
use zoneguard::app::events::AppEvent;
use zoneguard::app::service::ScanEngine;
use zoneguard::indicators::{BlinkRate, LedColor, LedRequest};
use zoneguard::sensors::SensorId;
use zoneguard::zones::{ZoneId, ZoneState};

use crate::mock_hw::{MockPanel, RecordingSink, bench_config};

/// House zone 1 (entry) relay GPIO; front entry is sensor 0 on input 0.
const ENTRY_RELAY: u8 = 8;
const PERIMETER_RELAY: u8 = 9;
const FRONT_ENTRY: SensorId = SensorId(0);

fn zone(n: u8) -> ZoneId {
    ZoneId::new(n).unwrap()
}

fn armed_entry() -> (ScanEngine, MockPanel, RecordingSink) {
    let mut engine = ScanEngine::new(&bench_config()).unwrap();
    let mut panel = MockPanel::new();
    let mut sink = RecordingSink::new();
    engine.start(&mut panel, &mut sink);
    engine.handle_command(
        AppCommand::Arm {
            zone: zone(1),
            armed: true,
        },
        &mut panel,
        &mut sink,
    );
    sink.take();
    (engine, panel, sink)
}

fn scan_at(engine: &mut ScanEngine, panel: &mut MockPanel, sink: &mut RecordingSink, ms: u64) {
    panel.clock.set_ms(ms);
    engine.scan(panel, sink);
}

// ── Minimum dwell ─────────────────────────────────────────────

#[test]
fn relay_holds_minimum_dwell_after_brief_trip() {
    let (mut engine, mut panel, mut sink) = armed_entry();

    panel.set_input(0, true);
    scan_at(&mut engine, &mut panel, &mut sink, 0);
    assert_eq!(panel.relay(ENTRY_RELAY), Some(true));

    panel.set_input(0, false);
    scan_at(&mut engine, &mut panel, &mut sink, 1_000);
    assert_eq!(panel.relay(ENTRY_RELAY), Some(true));
    assert_eq!(engine.zones().state(zone(1)), ZoneState::ArmedDwell);

    scan_at(&mut engine, &mut panel, &mut sink, 4_999);
    assert_eq!(panel.relay(ENTRY_RELAY), Some(true));

    scan_at(&mut engine, &mut panel, &mut sink, 5_000);
    assert_eq!(panel.relay(ENTRY_RELAY), Some(false));
    assert_eq!(engine.zones().state(zone(1)), ZoneState::ArmedIdle);

    let alarms: Vec<_> = sink
        .take()
        .into_iter()
        .filter(|e| matches!(e, AppEvent::ZoneTriggered { .. } | AppEvent::ZoneCleared { .. }))
        .collect();
    assert_eq!(
        alarms,
        vec![
            AppEvent::ZoneTriggered {
                zone: zone(1),
                at_ms: 0
            },
            AppEvent::ZoneCleared {
                zone: zone(1),
                at_ms: 5_000
            },
        ]
    );
}

#[test]
fn dwell_expires_across_clock_wrap() {
    let (mut engine, mut panel, mut sink) = armed_entry();
    let start = u64::from(u32::MAX) - 1_000;

    panel.set_input(0, true);
    scan_at(&mut engine, &mut panel, &mut sink, start);
    panel.set_input(0, false);
    scan_at(&mut engine, &mut panel, &mut sink, start + 10);

    // Past the wrap of the millisecond counter.
    scan_at(&mut engine, &mut panel, &mut sink, start + 2_000);
    assert!(engine.zones().triggered(zone(1)));
    scan_at(&mut engine, &mut panel, &mut sink, start + 4_999);
    assert!(engine.zones().triggered(zone(1)));
    scan_at(&mut engine, &mut panel, &mut sink, start + 5_000);
    assert!(!engine.zones().triggered(zone(1)));
    assert_eq!(panel.relay(ENTRY_RELAY), Some(false));
}

#[test]
fn sustained_abnormal_keeps_relay_tripped() {
    let (mut engine, mut panel, mut sink) = armed_entry();
    panel.set_input(0, true);
    for ms in (0..=15_000).step_by(250) {
        scan_at(&mut engine, &mut panel, &mut sink, ms);
        assert_eq!(panel.relay(ENTRY_RELAY), Some(true), "dropped at {ms} ms");
    }
}

#[test]
fn zone_stays_tripped_while_any_sensor_abnormal() {
    let (mut engine, mut panel, mut sink) = armed_entry();
    panel.set_input(0, true); // front entry
    panel.set_input(1, true); // garage door
    scan_at(&mut engine, &mut panel, &mut sink, 0);

    panel.set_input(0, false);
    scan_at(&mut engine, &mut panel, &mut sink, 20_000);
    assert_eq!(engine.zones().state(zone(1)), ZoneState::ArmedActive);
    assert_eq!(panel.relay(ENTRY_RELAY), Some(true));
}

#[test]
fn disarmed_zone_never_trips_its_relay() {
    let (mut engine, mut panel, mut sink) = armed_entry();
    panel.set_input(2, true); // shop door, perimeter zone
    scan_at(&mut engine, &mut panel, &mut sink, 0);
    assert_eq!(panel.relay(PERIMETER_RELAY), Some(false));
    assert_eq!(engine.zones().state(zone(2)), ZoneState::Disarmed);
    assert_eq!(engine.sensors().color(SensorId(2)), LedColor::Yellow);
}

// ── Disarm / re-arm ───────────────────────────────────────────

#[test]
fn disarm_releases_relay_immediately() {
    let (mut engine, mut panel, mut sink) = armed_entry();
    panel.set_input(0, true);
    scan_at(&mut engine, &mut panel, &mut sink, 0);
    assert_eq!(panel.relay(ENTRY_RELAY), Some(true));

    panel.clock.set_ms(10);
    engine.handle_command(
        AppCommand::Arm {
            zone: zone(1),
            armed: false,
        },
        &mut panel,
        &mut sink,
    );
    // Same tick: no scan has run since.
    assert_eq!(panel.relay(ENTRY_RELAY), Some(false));
    assert!(!engine.zones().triggered(zone(1)));
    assert!(!engine.zones().dwell(zone(1)).is_set());
    assert!(sink.events.contains(&AppEvent::ZoneArmed {
        zone: zone(1),
        armed: false,
        at_ms: 10
    }));

    // Still abnormal, now shown as a disarmed fault.
    scan_at(&mut engine, &mut panel, &mut sink, 20);
    assert_eq!(panel.relay(ENTRY_RELAY), Some(false));
    assert_eq!(engine.sensors().color(FRONT_ENTRY), LedColor::Yellow);
}

#[test]
fn trigger_latch_survives_disarm_and_clears_on_rearm() {
    let (mut engine, mut panel, mut sink) = armed_entry();
    panel.set_input(0, true);
    scan_at(&mut engine, &mut panel, &mut sink, 0);
    panel.set_input(0, false);
    scan_at(&mut engine, &mut panel, &mut sink, 100);
    assert_eq!(
        engine.sensors().request(FRONT_ENTRY),
        LedRequest::blinking(LedColor::Red, BlinkRate::Fast)
    );

    engine.handle_command(AppCommand::ArmAll(false), &mut panel, &mut sink);
    scan_at(&mut engine, &mut panel, &mut sink, 200);
    assert_eq!(
        engine.sensors().request(FRONT_ENTRY),
        LedRequest::blinking(LedColor::Green, BlinkRate::Slow)
    );

    engine.handle_command(AppCommand::ArmAll(true), &mut panel, &mut sink);
    assert!(!engine.sensors().triggered(FRONT_ENTRY));
    scan_at(&mut engine, &mut panel, &mut sink, 300);
    assert_eq!(
        engine.sensors().request(FRONT_ENTRY),
        LedRequest::steady(LedColor::Green)
    );
    assert_eq!(engine.zones().armed_mask(), 0b1_1111);
}

#[test]
fn reset_sensor_clears_latch_only() {
    let (mut engine, mut panel, mut sink) = armed_entry();
    panel.set_input(0, true);
    scan_at(&mut engine, &mut panel, &mut sink, 0);
    panel.set_input(0, false);
    scan_at(&mut engine, &mut panel, &mut sink, 100);

    engine.handle_command(AppCommand::ResetSensor(FRONT_ENTRY), &mut panel, &mut sink);
    scan_at(&mut engine, &mut panel, &mut sink, 200);
    assert!(!engine.sensors().triggered(FRONT_ENTRY));
    assert_eq!(engine.sensors().color(FRONT_ENTRY), LedColor::Green);
    // The relay is governed by the zone dwell, not the latch.
    assert_eq!(panel.relay(ENTRY_RELAY), Some(true));
}
