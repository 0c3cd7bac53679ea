//! Two-colour sensor indicators.
//!
//! Each sensor owns a red and a green lamp on the output cascade.  The
//! sensor engine decides *what* a lamp should show ([`LedRequest`]); the
//! [`mux::LedMux`] decides *when* each colour is actually lit, because
//! both colours of every lamp share the cascade at different instants.
//!
//! | Colour  | Red lamp | Green lamp |
//! |---------|----------|------------|
//! | Off     | —        | —          |
//! | Red     | lit      | —          |
//! | Green   | —        | lit        |
//! | Yellow  | lit      | lit        |

pub mod mux;

use crate::config::LedConfig;

/// Requested lamp colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedColor {
    #[default]
    Off,
    Red,
    Green,
    Yellow,
}

impl LedColor {
    pub fn has_red(self) -> bool {
        matches!(self, Self::Red | Self::Yellow)
    }

    pub fn has_green(self) -> bool {
        matches!(self, Self::Green | Self::Yellow)
    }
}

/// Requested blink rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlinkRate {
    #[default]
    None,
    Slow,
    Medium,
    Fast,
}

impl BlinkRate {
    /// Blink period in milliseconds; `0` for a steady lamp.
    pub fn period_ms(self, leds: &LedConfig) -> u32 {
        match self {
            Self::None => 0,
            Self::Slow => leds.slow_blink_ms,
            Self::Medium => leds.medium_blink_ms,
            Self::Fast => leds.fast_blink_ms,
        }
    }
}

/// What a sensor asks its lamp to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedRequest {
    pub color: LedColor,
    pub blink: BlinkRate,
}

impl LedRequest {
    pub const OFF: Self = Self::steady(LedColor::Off);

    pub const fn steady(color: LedColor) -> Self {
        Self {
            color,
            blink: BlinkRate::None,
        }
    }

    pub const fn blinking(color: LedColor, blink: BlinkRate) -> Self {
        Self { color, blink }
    }

    /// Blink gate: lit during even-numbered blink periods.
    pub fn gate_open(&self, now_ms: u32, leds: &LedConfig) -> bool {
        match self.blink.period_ms(leds) {
            0 => true,
            period => (now_ms / period) % 2 == 0,
        }
    }
}
