//! Application core — pure domain logic, zero I/O.
//!
//! The scan engine, its commands and events, and the **port traits**
//! defined in [`ports`] that keep this layer testable without real
//! peripherals.

pub mod commands;
pub mod context;
pub mod events;
pub mod ports;
pub mod service;
