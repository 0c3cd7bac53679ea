//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                      |
//! |------------|----------------|----------------------------------|
//! | `hardware` | InputCascade   | 74HC165 chain (`drivers::shift`) |
//! |            | OutputCascade  | 74HC595 chain (`drivers::shift`) |
//! |            | RelayPort      | Relay GPIOs (`drivers::relay`)   |
//! |            | ControlPort    | ADC1 (`drivers::hw_init`)        |
//! | `log_sink` | EventSink      | Serial log output                |
//! | `time`     | ClockPort      | ESP32 system timer               |

pub mod hardware;
pub mod log_sink;
pub mod time;
