//! Fuzz target: `SystemConfig::decode`
//!
//! Arbitrary blobs must either be rejected or decode into a configuration
//! that passes validation and builds a working scan engine.
//!
//! cargo fuzz run fuzz_config_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use zoneguard::app::service::ScanEngine;
use zoneguard::config::SystemConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = SystemConfig::decode(data) {
        assert!(config.validate().is_ok());
        assert!(ScanEngine::new(&config).is_ok(), "validated config rejected by engine");
    }
});
