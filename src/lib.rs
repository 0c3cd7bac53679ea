//! ZoneGuard scan-engine library.
//!
//! Exposes the pure-logic modules for integration testing and the
//! firmware binary.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod controls;
pub mod error;
pub mod indicators;
pub mod pins;
pub mod sensors;
pub mod timing;
pub mod zones;

pub mod adapters;
pub mod drivers;
