//! Red/green time multiplexing over the output cascade.
//!
//! The red and green lamps of every sensor are lit in separate phases so a
//! "yellow" lamp is simply both phases in quick succession.  One display
//! cycle runs:
//!
//! ```text
//!  Idle ─▶ Red ─────▶ RedGap ──▶ Green ─────▶ GreenGap ──▶ Idle
//!          red_hold   off/2      green_hold   (off+1)/2
//! ```
//!
//! Each transition clears every lamp bit of the finished colour and
//! latches the cascade, so the outputs are all-zero before the red phase,
//! between the phases and after the green phase.
//!
//! [`LedMux::poll`] never blocks: it advances as far as the microsecond
//! clock allows and reports how long the current phase still has to run.
//! Holds are timed from the clock reading taken after each latch.
//! The blink gate is evaluated once per cycle, at [`LedMux::begin`].

use heapless::Vec;
use log::trace;

use super::LedRequest;
use crate::app::ports::{ClockPort, OutputCascade};
use crate::config::{LedConfig, MAX_SENSORS};
use crate::timing::Deadline;

/// One sensor's lamp wiring and what it should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lamp {
    pub red: Option<u8>,
    pub green: Option<u8>,
    pub request: LedRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MuxPhase {
    #[default]
    Idle,
    Red,
    RedGap,
    Green,
    GreenGap,
}

/// Result of one [`LedMux::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxPoll {
    /// The current phase needs this many more microseconds.
    Hold { remaining_us: u32 },
    /// The cycle finished (or none was running).
    Done,
}

pub struct LedMux {
    leds: LedConfig,
    phase: MuxPhase,
    deadline: Deadline,
    lamps: Vec<Lamp, MAX_SENSORS>,
    /// Millisecond clock at `begin`, for the blink gate.
    gate_ms: u32,
    cycles: u32,
}

impl LedMux {
    pub fn new(leds: LedConfig) -> Self {
        Self {
            leds,
            phase: MuxPhase::Idle,
            deadline: Deadline::NONE,
            lamps: Vec::new(),
            gate_ms: 0,
            cycles: 0,
        }
    }

    pub fn phase(&self) -> MuxPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == MuxPhase::Idle
    }

    /// Completed display cycles (wraps).
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Start a display cycle: capture the lamps, light the red phase.
    ///
    /// A cycle still in progress is abandoned with its lamps cleared first.
    /// `now_ms` drives the blink gate; the red hold starts once the latch
    /// has completed.
    pub fn begin(
        &mut self,
        now_ms: u32,
        lamps: impl IntoIterator<Item = Lamp>,
        out: &mut (impl OutputCascade + ClockPort),
    ) {
        if !self.is_idle() {
            self.clear_all(out);
        }

        self.lamps.clear();
        for lamp in lamps {
            if self.lamps.push(lamp).is_err() {
                break;
            }
        }
        self.gate_ms = now_ms;

        for lamp in &self.lamps {
            if let Some(bit) = lamp.red {
                let lit = lamp.request.color.has_red() && lamp.request.gate_open(now_ms, &self.leds);
                out.set(bit, lit);
            }
        }
        out.write();

        self.enter(MuxPhase::Red, out.micros(), self.leds.red_hold_us);
    }

    /// Advance the cycle as far as the clock allows.
    ///
    /// Every hold is measured from the end of the latch that opened it, so
    /// time spent shifting the cascade never eats into a phase.
    pub fn poll(&mut self, out: &mut (impl OutputCascade + ClockPort)) -> MuxPoll {
        loop {
            if self.phase == MuxPhase::Idle {
                return MuxPoll::Done;
            }
            let now_us = out.micros();
            if !self.deadline.has_elapsed(now_us) {
                return MuxPoll::Hold {
                    remaining_us: self.deadline.remaining(now_us),
                };
            }

            match self.phase {
                MuxPhase::Red => {
                    self.clear_red(out);
                    out.write();
                    self.enter(MuxPhase::RedGap, out.micros(), self.leds.off_hold_us / 2);
                }
                MuxPhase::RedGap => {
                    for lamp in &self.lamps {
                        if let Some(bit) = lamp.green {
                            let lit = lamp.request.color.has_green()
                                && lamp.request.gate_open(self.gate_ms, &self.leds);
                            out.set(bit, lit);
                        }
                    }
                    out.write();
                    self.enter(MuxPhase::Green, out.micros(), self.leds.green_hold_us);
                }
                MuxPhase::Green => {
                    self.clear_green(out);
                    out.write();
                    self.enter(MuxPhase::GreenGap, out.micros(), self.leds.off_hold_us.div_ceil(2));
                }
                MuxPhase::GreenGap => {
                    self.phase = MuxPhase::Idle;
                    self.deadline.cancel();
                    self.cycles = self.cycles.wrapping_add(1);
                    return MuxPoll::Done;
                }
                MuxPhase::Idle => return MuxPoll::Done,
            }
        }
    }

    fn enter(&mut self, phase: MuxPhase, now_us: u32, hold_us: u32) {
        trace!("mux: {phase:?} for {hold_us} us");
        self.phase = phase;
        self.deadline.set(now_us, hold_us);
    }

    fn clear_red(&self, out: &mut impl OutputCascade) {
        for bit in self.lamps.iter().filter_map(|l| l.red) {
            out.set(bit, false);
        }
    }

    fn clear_green(&self, out: &mut impl OutputCascade) {
        for bit in self.lamps.iter().filter_map(|l| l.green) {
            out.set(bit, false);
        }
    }

    fn clear_all(&mut self, out: &mut impl OutputCascade) {
        self.clear_red(out);
        self.clear_green(out);
        out.write();
        self.phase = MuxPhase::Idle;
        self.deadline.cancel();
    }
}
