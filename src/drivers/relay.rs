//! Zone alarm relay bank.
//!
//! One output pin per zone, addressed by GPIO number so the zone table can
//! name relays the same way the board schematic does.

use embedded_hal::digital::OutputPin;
use heapless::Vec;
use log::{debug, warn};

use crate::app::ports::RelayPort;
use crate::config::MAX_ZONES;

struct Relay<P> {
    gpio: u8,
    pin: P,
    level: Option<bool>,
}

pub struct RelayBank<P> {
    relays: Vec<Relay<P>, MAX_ZONES>,
}

impl<P: OutputPin> Default for RelayBank<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin> RelayBank<P> {
    pub fn new() -> Self {
        Self { relays: Vec::new() }
    }

    /// Register the pin wired to relay GPIO `gpio`.  Returns the pin back
    /// when the bank is full.
    pub fn add(&mut self, gpio: u8, pin: P) -> Result<(), P> {
        self.relays
            .push(Relay {
                gpio,
                pin,
                level: None,
            })
            .map_err(|r| r.pin)
    }

    /// Last level successfully driven on `gpio`.
    pub fn level(&self, gpio: u8) -> Option<bool> {
        self.relays.iter().find(|r| r.gpio == gpio).and_then(|r| r.level)
    }
}

impl<P: OutputPin> RelayPort for RelayBank<P> {
    fn drive(&mut self, pin: u8, high: bool) {
        let Some(relay) = self.relays.iter_mut().find(|r| r.gpio == pin) else {
            debug!("relay: GPIO {pin} not in bank");
            return;
        };
        if relay.level == Some(high) {
            return;
        }
        match relay.pin.set_state(high.into()) {
            Ok(()) => relay.level = Some(high),
            Err(_) => warn!("relay: GPIO {pin} write failed"),
        }
    }
}
