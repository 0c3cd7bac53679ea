//! Unified error types for the ZoneGuard scan engine.
//!
//! The scan core itself never fails: accessors fall back to safe defaults
//! and clock wrap is handled arithmetically.  Errors only arise while
//! validating/decoding the configuration tables at start-up and while
//! bit-banging the shift cascades and relay pins.  All variants are `Copy`
//! so drivers can stash the last failure without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The configuration tables are inconsistent or could not be decoded.
    Config(ConfigError),
    /// A GPIO transfer on a shift cascade or relay pin failed.
    Io(IoError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A table has more entries than its fixed capacity.
    TooManyEntries { table: &'static str, capacity: usize },
    /// A sensor references a zone that is not configured.
    ZoneOutOfRange { sensor: u8, zone: u8 },
    /// A sensor input index lies beyond the input cascade width.
    InputOutOfRange { sensor: u8, bit: u8 },
    /// A sensor indicator index lies beyond the output cascade width.
    OutputOutOfRange { sensor: u8, bit: u8 },
    /// A zone dwell exceeds what the wrap guard can represent.
    DwellTooLong { zone: u8, secs: u16 },
    /// An indicator phase hold exceeds what the wrap guard can represent.
    HoldTooLong { phase: &'static str, us: u32 },
    /// A blink period is zero.
    InvalidBlinkPeriod,
    /// A shift cascade has no registers or too many.
    InvalidCascade { registers: u8 },
    /// The configuration blob could not be decoded.
    Decode,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyEntries { table, capacity } => {
                write!(f, "{table} table exceeds {capacity} entries")
            }
            Self::ZoneOutOfRange { sensor, zone } => {
                write!(f, "sensor {sensor} references unknown zone {zone}")
            }
            Self::InputOutOfRange { sensor, bit } => {
                write!(f, "sensor {sensor} input bit {bit} beyond input cascade")
            }
            Self::OutputOutOfRange { sensor, bit } => {
                write!(f, "sensor {sensor} indicator bit {bit} beyond output cascade")
            }
            Self::DwellTooLong { zone, secs } => {
                write!(f, "zone {zone} dwell of {secs}s exceeds wrap guard")
            }
            Self::HoldTooLong { phase, us } => {
                write!(f, "{phase} hold of {us}us exceeds wrap guard")
            }
            Self::InvalidBlinkPeriod => write!(f, "blink period must be non-zero"),
            Self::InvalidCascade { registers } => {
                write!(f, "cascade of {registers} registers is not supported")
            }
            Self::Decode => write!(f, "config blob could not be decoded"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Pin I/O errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoError {
    /// Driving a clock, latch, data or relay line failed.
    PinWrite,
    /// Sampling the serial data line failed.
    PinRead,
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinWrite => write!(f, "GPIO write failed"),
            Self::PinRead => write!(f, "GPIO read failed"),
        }
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
