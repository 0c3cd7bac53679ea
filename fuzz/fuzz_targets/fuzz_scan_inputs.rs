//! Fuzz target: `ScanEngine::scan` + `show` over arbitrary input streams.
//!
//! Each 8-byte chunk is one input cascade image; the next two bytes
//! advance the clock.  The engine must never panic and the output cascade
//! must be dark between display phases.
//!
//! cargo fuzz run fuzz_scan_inputs

#![no_main]

use libfuzzer_sys::fuzz_target;
use zoneguard::app::commands::AppCommand;
use zoneguard::app::ports::{ClockPort, ControlPort, InputCascade, NullSink, OutputCascade, RelayPort};
use zoneguard::app::service::ScanEngine;
use zoneguard::config::SystemConfig;
use zoneguard::indicators::mux::MuxPoll;

#[derive(Default)]
struct Panel {
    now_ms: u32,
    now_us: u32,
    live: u64,
    image: u64,
    staged: u64,
    frames: u32,
}

impl ClockPort for Panel {
    fn millis(&self) -> u32 {
        self.now_ms
    }
    fn micros(&self) -> u32 {
        self.now_us
    }
}

impl InputCascade for Panel {
    fn read(&mut self) {
        self.image = self.live;
    }
    fn get(&self, bit: u8) -> bool {
        bit < 64 && self.image & (1 << bit) != 0
    }
}

impl OutputCascade for Panel {
    fn set(&mut self, bit: u8, on: bool) {
        if bit < 64 {
            if on {
                self.staged |= 1 << bit;
            } else {
                self.staged &= !(1 << bit);
            }
        }
    }
    fn write(&mut self) {
        self.frames += 1;
        if self.frames % 2 == 0 {
            assert_eq!(self.staged, 0, "cascade lit in a gap");
        }
    }
}

impl RelayPort for Panel {
    fn drive(&mut self, _pin: u8, _high: bool) {}
}

impl ControlPort for Panel {
    fn sample(&mut self, channel: u8) -> u16 {
        (self.live >> (channel * 12)) as u16 & 0x0fff
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut engine) = ScanEngine::new(&SystemConfig::default()) else {
        return;
    };
    let mut panel = Panel::default();
    let mut sink = NullSink;
    engine.start(&mut panel, &mut sink);

    for chunk in data.chunks(10) {
        let mut image = [0u8; 8];
        let n = chunk.len().min(8);
        image[..n].copy_from_slice(&chunk[..n]);
        panel.live = u64::from_le_bytes(image);

        let step = chunk.get(8..10).map_or(1, |b| u16::from_le_bytes([b[0], b[1]]));
        panel.now_ms = panel.now_ms.wrapping_add(u32::from(step));
        if step % 97 == 0 {
            engine.handle_command(AppCommand::LampTest, &mut panel, &mut sink);
        }

        while let MuxPoll::Hold { remaining_us } = engine.poll(&mut panel, &mut sink) {
            panel.now_us = panel.now_us.wrapping_add(remaining_us);
        }
    }
});
