//! Static configuration tables.
//!
//! Sensor, zone, indicator and control parameters for one panel
//! installation.  The tables are built once at start-up (either from
//! [`SystemConfig::default`] or a `postcard` blob baked into flash),
//! validated, and never mutated afterwards.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::pins;
use crate::timing::MAX_TIMEOUT;

/// Capacity of the sensor table.
pub const MAX_SENSORS: usize = 64;
/// Capacity of the zone table (zones are tracked in `u8` bitmasks).
pub const MAX_ZONES: usize = 8;
/// Capacity of the control-input table.
pub const MAX_CONTROLS: usize = 8;
/// Longest supported shift cascade, in 8-bit registers.
pub const MAX_CASCADE_REGISTERS: u8 = 16;

/// Cascade index meaning "not wired".
pub const UNWIRED: u8 = 255;
/// Sensor zone meaning "not assigned to any zone".
pub const NO_ZONE: u8 = 0;

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// One input sensor and its two-colour indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Owning zone, 1-based; [`NO_ZONE`] when unassigned.
    pub zone: u8,
    /// Input cascade bit, or [`UNWIRED`].
    pub input: u8,
    /// Output cascade bit of the red lamp, or [`UNWIRED`].
    pub red: u8,
    /// Output cascade bit of the green lamp, or [`UNWIRED`].
    pub green: u8,
    /// Extra scan ticks a changed reading must hold before it is accepted.
    pub debounce_ticks: u8,
    /// Raw level of the input when the sensor is in its normal state.
    pub normally_high: bool,
}

impl SensorConfig {
    /// Input cascade bit, `None` when unwired.
    pub fn input_bit(&self) -> Option<u8> {
        wired(self.input)
    }

    pub fn red_bit(&self) -> Option<u8> {
        wired(self.red)
    }

    pub fn green_bit(&self) -> Option<u8> {
        wired(self.green)
    }
}

fn wired(index: u8) -> Option<u8> {
    (index != UNWIRED).then_some(index)
}

/// One zone alarm relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// GPIO driving the relay coil.
    pub relay_pin: u8,
    /// Relay level while the zone is not triggered.
    pub normal_level: bool,
    /// Minimum time the relay stays tripped after the zone goes abnormal.
    pub min_dwell_secs: u16,
}

/// Shift cascade geometry and wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftConfig {
    pub registers: u8,
    pub data: u8,
    pub clock: u8,
    pub latch: u8,
}

impl ShiftConfig {
    /// Number of addressable bits in the cascade.
    pub fn bits(&self) -> u16 {
        self.registers as u16 * 8
    }
}

/// Indicator multiplexing duty cycle and blink periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedConfig {
    /// Red phase hold (µs).
    pub red_hold_us: u32,
    /// Green phase hold (µs).
    pub green_hold_us: u32,
    /// Dark time per cycle, split evenly after each phase (µs).
    pub off_hold_us: u32,
    /// Blink periods (ms).
    pub slow_blink_ms: u32,
    pub medium_blink_ms: u32,
    pub fast_blink_ms: u32,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            red_hold_us: 100,
            green_hold_us: 100,
            off_hold_us: 50,
            slow_blink_ms: 1000,
            medium_blink_ms: 500,
            fast_blink_ms: 250,
        }
    }
}

/// One analog arming control input.  Control `i` arms zone `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlConfig {
    /// ADC channel to sample.
    pub channel: u8,
    /// Whether a reading above `threshold` means "armed".
    pub sense_high: bool,
    /// Raw ADC threshold.
    pub threshold: u16,
}

/// How much the engine reports through the event sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum TraceLevel {
    Off,
    /// Arming changes, zone trips and lamp tests.
    #[default]
    Arming,
    /// Additionally every committed sensor status change.
    Sensors,
}

// ---------------------------------------------------------------------------
// SystemConfig
// ---------------------------------------------------------------------------

/// Complete panel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub input: ShiftConfig,
    pub output: ShiftConfig,
    pub leds: LedConfig,
    pub sensors: Vec<SensorConfig, MAX_SENSORS>,
    /// Zone `n` (1-based) lives at index `n - 1`.
    pub zones: Vec<ZoneConfig, MAX_ZONES>,
    pub controls: Vec<ControlConfig, MAX_CONTROLS>,
    /// Lamp test length after power-on (seconds).
    pub boot_lamp_test_secs: u8,
    /// Lamp test length when requested explicitly (seconds).
    pub forced_lamp_test_secs: u8,
    pub trace: TraceLevel,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            input: ShiftConfig {
                registers: pins::IN_REGISTERS,
                data: pins::IN_DATA_GPIO,
                clock: pins::IN_CLOCK_GPIO,
                latch: pins::IN_LATCH_GPIO,
            },
            output: ShiftConfig {
                registers: pins::OUT_REGISTERS,
                data: pins::OUT_DATA_GPIO,
                clock: pins::OUT_CLOCK_GPIO,
                latch: pins::OUT_LATCH_GPIO,
            },
            leds: LedConfig::default(),
            sensors: Vec::from_slice(&HOUSE_SENSORS).unwrap_or_default(),
            zones: Vec::from_slice(&HOUSE_ZONES).unwrap_or_default(),
            controls: Vec::from_slice(&HOUSE_CONTROLS).unwrap_or_default(),
            boot_lamp_test_secs: 8,
            forced_lamp_test_secs: 60,
            trace: TraceLevel::Arming,
        }
    }
}

impl SystemConfig {
    /// Decode a `postcard` configuration blob and validate it.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode into a `postcard` blob suitable for [`decode`](Self::decode).
    pub fn encode(&self) -> Result<std::vec::Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Decode.into())
    }

    /// Check that every table entry is consistent with the cascade
    /// geometry and the zone table.
    pub fn validate(&self) -> Result<()> {
        for cascade in [&self.input, &self.output] {
            if cascade.registers == 0 || cascade.registers > MAX_CASCADE_REGISTERS {
                return Err(ConfigError::InvalidCascade {
                    registers: cascade.registers,
                }
                .into());
            }
        }

        let leds = &self.leds;
        if leds.slow_blink_ms == 0 || leds.medium_blink_ms == 0 || leds.fast_blink_ms == 0 {
            return Err(ConfigError::InvalidBlinkPeriod.into());
        }
        for (phase, us) in [
            ("red", leds.red_hold_us),
            ("green", leds.green_hold_us),
            ("off", leds.off_hold_us),
        ] {
            if us > MAX_TIMEOUT {
                return Err(ConfigError::HoldTooLong { phase, us }.into());
            }
        }

        let zone_count = self.zones.len() as u8;
        for (i, s) in self.sensors.iter().enumerate() {
            let sensor = i as u8;
            if s.zone > zone_count {
                return Err(ConfigError::ZoneOutOfRange { sensor, zone: s.zone }.into());
            }
            if let Some(bit) = s.input_bit() {
                if u16::from(bit) >= self.input.bits() {
                    return Err(ConfigError::InputOutOfRange { sensor, bit }.into());
                }
            }
            for bit in [s.red_bit(), s.green_bit()].into_iter().flatten() {
                if u16::from(bit) >= self.output.bits() {
                    return Err(ConfigError::OutputOutOfRange { sensor, bit }.into());
                }
            }
        }

        for (i, z) in self.zones.iter().enumerate() {
            if u32::from(z.min_dwell_secs) * 1000 > MAX_TIMEOUT {
                return Err(ConfigError::DwellTooLong {
                    zone: i as u8 + 1,
                    secs: z.min_dwell_secs,
                }
                .into());
            }
        }

        if self.controls.len() > self.zones.len() {
            return Err(ConfigError::TooManyEntries {
                table: "control",
                capacity: self.zones.len(),
            }
            .into());
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// House installation tables
// ---------------------------------------------------------------------------

const Z_ENTRY: u8 = 1;
const Z_PERIMETER: u8 = 2;
const Z_BREAKAGE: u8 = 3;
const Z_INTERIOR: u8 = 4;

/// Seconds a zone relay stays tripped after a trigger.
const MIN_DWELL_SECS: u16 = 5;

const HOUSE_ZONES: [ZoneConfig; 5] = [
    zone(pins::RELAY_ENTRY_GPIO),     // legitimate entrances
    zone(pins::RELAY_PERIMETER_GPIO), // obvious break-in points
    zone(pins::RELAY_BREAKAGE_GPIO),  // window breakage sensors
    zone(pins::RELAY_INTERIOR_GPIO),  // OK if people are home
    zone(pins::RELAY_SPARE_GPIO),
];

const fn zone(relay_pin: u8) -> ZoneConfig {
    ZoneConfig {
        relay_pin,
        normal_level: false,
        min_dwell_secs: MIN_DWELL_SECS,
    }
}

/// Reed, mechanical and mercury switches all settle well inside one scan.
const D_NONE: u8 = 0;

const fn sensor(zone: u8, input: u8, red: u8, green: u8) -> SensorConfig {
    SensorConfig {
        zone,
        input,
        red,
        green,
        debounce_ticks: D_NONE,
        normally_high: false,
    }
}

const HOUSE_SENSORS: [SensorConfig; 32] = [
    sensor(Z_ENTRY, 0, 0, 1),         // front entry
    sensor(Z_ENTRY, 1, 2, 3),         // garage door
    sensor(Z_PERIMETER, 2, 4, 5),     // shop door
    sensor(Z_INTERIOR, 3, 6, 7),      // closet door
    sensor(Z_PERIMETER, 4, 8, 9),     // bell tamper
    sensor(Z_INTERIOR, 5, 10, 11),    // master bedroom slider
    sensor(Z_INTERIOR, 6, 12, 13),    // laundry slider
    sensor(Z_INTERIOR, 7, 14, 15),    // laundry door
    sensor(Z_INTERIOR, 8, 16, 17),    // dining room slider
    sensor(Z_INTERIOR, 9, 18, 19),    // north bedroom
    sensor(Z_BREAKAGE, 10, 20, 21),   // north bedroom glass L
    sensor(Z_BREAKAGE, 11, 22, 23),   // north bedroom glass R
    sensor(Z_PERIMETER, 12, 24, 25),  // study south
    sensor(Z_BREAKAGE, 13, 26, 27),   // study south glass L
    sensor(Z_BREAKAGE, 14, 28, 29),   // study south glass R
    sensor(Z_ENTRY, 15, 30, 31),      // back entry
    sensor(Z_PERIMETER, 16, 32, 33),  // basement door
    sensor(Z_INTERIOR, 17, 34, 35),   // play room
    sensor(Z_BREAKAGE, 18, 36, 37),   // play room glass L
    sensor(Z_BREAKAGE, 19, 38, 39),   // play room glass R
    sensor(Z_INTERIOR, 20, 40, 41),   // study north
    sensor(Z_BREAKAGE, 21, 42, 43),   // study north glass L
    sensor(Z_BREAKAGE, 22, 44, 45),   // study north glass R
    sensor(NO_ZONE, 23, 46, 47),      // stairway (broken)
    sensor(Z_INTERIOR, 24, 48, 49),   // play room slider
    sensor(Z_BREAKAGE, 25, 50, 51),   // play room slider glass L
    sensor(Z_BREAKAGE, 26, 52, 53),   // play room slider glass R
    sensor(Z_PERIMETER, 27, 54, 55),  // south office
    sensor(Z_PERIMETER, 28, 56, 57),  // front room left
    sensor(Z_PERIMETER, 29, 58, 59),  // front room right
    sensor(Z_BREAKAGE, 30, 60, 61),   // front room glass
    sensor(Z_PERIMETER, UNWIRED, 62, 63), // key tamper, not yet wired
];

const HOUSE_CONTROLS: [ControlConfig; 4] = [
    control(pins::CONTROL_ADC_CHANNELS[0]),
    control(pins::CONTROL_ADC_CHANNELS[1]),
    control(pins::CONTROL_ADC_CHANNELS[2]),
    control(pins::CONTROL_ADC_CHANNELS[3]),
];

const fn control(channel: u8) -> ControlConfig {
    ControlConfig {
        channel,
        sense_high: true,
        threshold: pins::ADC_FULL_SCALE / 2,
    }
}
