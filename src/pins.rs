//! GPIO / peripheral pin assignments for the ZoneGuard panel board.
//!
//! Single source of truth — the default configuration tables and the
//! firmware bootstrap reference this module rather than hard-coding pin
//! numbers.

// ---------------------------------------------------------------------------
// Sensor input cascade (74HC165 chain)
// ---------------------------------------------------------------------------

/// Serial data out of the last register in the chain.
pub const IN_DATA_GPIO: u8 = 5;
/// Shift clock, rising edge advances the chain.
pub const IN_CLOCK_GPIO: u8 = 6;
/// Parallel load, active low.
pub const IN_LATCH_GPIO: u8 = 7;
/// Number of 8-bit registers in the input chain.
pub const IN_REGISTERS: u8 = 4;

// ---------------------------------------------------------------------------
// Indicator output cascade (74HC595 chain)
// ---------------------------------------------------------------------------

pub const OUT_DATA_GPIO: u8 = 15;
pub const OUT_CLOCK_GPIO: u8 = 16;
/// Storage register clock: rising edge latches staged bits to the outputs.
pub const OUT_LATCH_GPIO: u8 = 17;
pub const OUT_REGISTERS: u8 = 8;

// ---------------------------------------------------------------------------
// Zone alarm relays
// ---------------------------------------------------------------------------

pub const RELAY_ENTRY_GPIO: u8 = 8;
pub const RELAY_PERIMETER_GPIO: u8 = 9;
pub const RELAY_BREAKAGE_GPIO: u8 = 10;
pub const RELAY_INTERIOR_GPIO: u8 = 11;
pub const RELAY_SPARE_GPIO: u8 = 12;

// ---------------------------------------------------------------------------
// Arming control inputs (ADC1, one channel per zone key switch)
// ---------------------------------------------------------------------------

/// ADC1 channels 0-3 (GPIO 1-4 on ESP32-S3).
pub const CONTROL_ADC_CHANNELS: [u8; 4] = [0, 1, 2, 3];
/// Full-scale reading of the 12-bit ADC.
pub const ADC_FULL_SCALE: u16 = 4095;
