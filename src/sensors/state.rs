//! Per-sensor runtime record and its two-byte packed form.
//!
//! [`SensorState`] is what the engine works with.  [`PackedSensorState`]
//! keeps the same information in a flag byte plus a countdown byte for
//! builds where 64 sensors must fit in 128 bytes of RAM:
//!
//! ```text
//!  bit  7        6     5       4        3      2     1        0
//!      (unused) prev  status  trigger  green  red   blink_hi blink_lo
//! ```
//!
//! `status`/`prev` store "abnormal".  Blink: lo = slow, hi = medium,
//! hi|lo = fast.

use crate::indicators::{BlinkRate, LedColor, LedRequest};

/// Runtime state of one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorState {
    /// Scans left before a changed raw value is accepted.
    pub countdown: u8,
    /// Committed (debounced) status.
    pub abnormal: bool,
    /// Last raw sample, normalised.
    pub previous: bool,
    /// Sticky trigger latch.
    pub triggered: bool,
    pub request: LedRequest,
}

impl SensorState {
    /// Feed one normalised raw sample.
    ///
    /// A sample that differs from the previous one reloads the countdown
    /// with `delay + 1`; the sample itself counts, so with `delay == 0` the
    /// change commits on the same scan.  Returns the new status when it
    /// was committed by this sample.
    pub fn debounce(&mut self, raw_abnormal: bool, delay: u8) -> Option<bool> {
        if raw_abnormal != self.previous {
            self.previous = raw_abnormal;
            self.countdown = delay.saturating_add(1);
        }

        if self.countdown > 0 {
            self.countdown -= 1;
            if self.countdown > 0 {
                return None;
            }
        }

        if raw_abnormal != self.abnormal {
            self.abnormal = raw_abnormal;
            return Some(raw_abnormal);
        }
        None
    }

    pub fn is_debouncing(&self) -> bool {
        self.countdown > 0
    }
}

const B_LO: u8 = 0x01;
const B_HI: u8 = 0x02;
const RED: u8 = 0x04;
const GREEN: u8 = 0x08;
const TRIGGER: u8 = 0x10;
const STATUS: u8 = 0x20;
const PREV: u8 = 0x40;

/// Bit-packed [`SensorState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedSensorState {
    flags: u8,
    countdown: u8,
}

impl PackedSensorState {
    pub fn flags(&self) -> u8 {
        self.flags
    }
}

impl From<SensorState> for PackedSensorState {
    fn from(s: SensorState) -> Self {
        let mut flags = 0;
        if s.abnormal {
            flags |= STATUS;
        }
        if s.previous {
            flags |= PREV;
        }
        if s.triggered {
            flags |= TRIGGER;
        }
        if s.request.color.has_red() {
            flags |= RED;
        }
        if s.request.color.has_green() {
            flags |= GREEN;
        }
        flags |= match s.request.blink {
            BlinkRate::None => 0,
            BlinkRate::Slow => B_LO,
            BlinkRate::Medium => B_HI,
            BlinkRate::Fast => B_HI | B_LO,
        };
        Self {
            flags,
            countdown: s.countdown,
        }
    }
}

impl From<PackedSensorState> for SensorState {
    fn from(p: PackedSensorState) -> Self {
        let f = p.flags;
        let color = match (f & RED != 0, f & GREEN != 0) {
            (true, true) => LedColor::Yellow,
            (true, false) => LedColor::Red,
            (false, true) => LedColor::Green,
            (false, false) => LedColor::Off,
        };
        let blink = match f & (B_HI | B_LO) {
            B_LO => BlinkRate::Slow,
            B_HI => BlinkRate::Medium,
            0 => BlinkRate::None,
            _ => BlinkRate::Fast,
        };
        Self {
            countdown: p.countdown,
            abnormal: f & STATUS != 0,
            previous: f & PREV != 0,
            triggered: f & TRIGGER != 0,
            request: LedRequest::blinking(color, blink),
        }
    }
}
