//! Panel peripheral drivers: shift cascades, relays and the control ADC.

pub mod hw_init;
pub mod relay;
pub mod shift;
