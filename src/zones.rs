//! Zone aggregation, arming and relay dwell.
//!
//! A zone groups sensors onto one alarm relay.  Every scan the engine:
//!
//! 1. clears the per-scan abnormal flags ([`ZoneEngine::reset_all`]),
//! 2. receives one [`set`](ZoneEngine::set) per abnormal sensor,
//! 3. resolves the trigger state and drives the relays
//!    ([`update`](ZoneEngine::update)).
//!
//! ```text
//!               arm                 sensor abnormal
//!  Disarmed ─────────▶ ArmedIdle ─────────────────▶ ArmedActive
//!     ▲                   ▲                            │ all normal
//!     │ disarm (any)      │ dwell elapsed              ▼
//!     └───────────────────┴──────────────────────── ArmedDwell
//! ```
//!
//! A relay stays tripped for at least `min_dwell_secs` after the zone first
//! went abnormal, and for as long as any sensor in it is still abnormal.

use core::fmt;

use heapless::Vec;
use log::{debug, info};

use crate::app::ports::RelayPort;
use crate::config::{MAX_ZONES, SystemConfig, ZoneConfig};
use crate::timing::Deadline;

// ───────────────────────────────────────────────────────────────
// ZoneId
// ───────────────────────────────────────────────────────────────

/// 1-based zone number, as printed on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneId(u8);

impl ZoneId {
    /// `None` for `0`, which is reserved for "no zone".
    pub const fn new(number: u8) -> Option<Self> {
        if number == 0 || number as usize > MAX_ZONES {
            None
        } else {
            Some(Self(number))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Position in the zone table.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    fn mask(self) -> u8 {
        1 << (self.0 - 1)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone {}", self.0)
    }
}

// ───────────────────────────────────────────────────────────────
// ZoneState
// ───────────────────────────────────────────────────────────────

/// Observable state of one zone after the last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneState {
    Disarmed,
    ArmedIdle,
    /// All sensors normal, relay held by the minimum dwell.
    ArmedDwell,
    /// At least one sensor abnormal.
    ArmedActive,
}

/// Trigger edges produced by one [`ZoneEngine::update`], as zone bitmasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneEdges {
    pub raised: u8,
    pub cleared: u8,
}

impl ZoneEdges {
    pub fn is_empty(&self) -> bool {
        self.raised == 0 && self.cleared == 0
    }
}

// ───────────────────────────────────────────────────────────────
// ZoneEngine
// ───────────────────────────────────────────────────────────────

pub struct ZoneEngine {
    zones: Vec<ZoneConfig, MAX_ZONES>,
    dwell: [Deadline; MAX_ZONES],
    abnormal: u8,
    armed: u8,
    triggered: u8,
}

impl ZoneEngine {
    /// All zones start disarmed, relays at their normal level once
    /// [`write_relays`](Self::write_relays) runs.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            zones: config.zones.clone(),
            dwell: [Deadline::NONE; MAX_ZONES],
            abnormal: 0,
            armed: 0,
            triggered: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// The id for a 1-based zone number, if that zone is configured.
    pub fn id(&self, number: u8) -> Option<ZoneId> {
        ZoneId::new(number).filter(|z| z.index() < self.zones.len())
    }

    pub fn ids(&self) -> impl Iterator<Item = ZoneId> + use<> {
        (1..=self.zones.len() as u8).filter_map(ZoneId::new)
    }

    fn configured(&self, zone: ZoneId) -> bool {
        zone.index() < self.zones.len()
    }

    // ── per-scan cycle ───────────────────────────────────────────

    /// Clear the per-scan abnormal flags.
    pub fn reset_all(&mut self) {
        self.abnormal = 0;
    }

    /// Report one sensor's committed status for this scan.
    ///
    /// An abnormal report on an armed zone starts the minimum dwell unless
    /// one is already running.  Reports for disarmed zones are recorded
    /// but never trip the relay.
    pub fn set(&mut self, now_ms: u32, zone: ZoneId, normal: bool) {
        if !self.configured(zone) {
            return;
        }
        if normal {
            self.abnormal &= !zone.mask();
            return;
        }

        self.abnormal |= zone.mask();
        if self.armed & zone.mask() == 0 {
            return;
        }

        let i = zone.index();
        if self.dwell[i].has_elapsed(now_ms) {
            let dwell_ms = u32::from(self.zones[i].min_dwell_secs) * 1000;
            self.dwell[i].set(now_ms, dwell_ms);
            debug!("{zone}: dwell until {}", self.dwell[i].raw());
        }
    }

    /// Resolve every zone's trigger state and drive its relay.
    pub fn update(&mut self, now_ms: u32, relays: &mut impl RelayPort) -> ZoneEdges {
        let before = self.triggered;
        let mut after = 0u8;

        for (i, deadline) in self.dwell.iter_mut().enumerate().take(self.zones.len()) {
            let mask = 1u8 << i;
            let dwelling = !deadline.has_elapsed(now_ms);
            if !dwelling {
                deadline.cancel();
            }
            let armed = self.armed & mask != 0;
            let abnormal = self.abnormal & mask != 0;
            if armed && (abnormal || dwelling) {
                after |= mask;
            }
        }

        self.triggered = after;
        self.write_relays(relays);

        let edges = ZoneEdges {
            raised: after & !before,
            cleared: before & !after,
        };
        if !edges.is_empty() {
            info!(
                "zones: triggered {:#010b} (raised {:#010b}, cleared {:#010b})",
                after, edges.raised, edges.cleared
            );
        }
        edges
    }

    /// Drive every relay from the current trigger bits.
    pub fn write_relays(&self, relays: &mut impl RelayPort) {
        for (i, zone) in self.zones.iter().enumerate() {
            let triggered = self.triggered & (1 << i) != 0;
            relays.drive(zone.relay_pin, triggered != zone.normal_level);
        }
    }

    // ── arming ───────────────────────────────────────────────────

    /// Arm or disarm one zone.  Disarming drops the trigger, the dwell and
    /// the abnormal flag immediately; the relay follows on the next
    /// [`write_relays`](Self::write_relays) or [`update`](Self::update).
    ///
    /// Returns whether the arming state changed.
    pub fn arm(&mut self, zone: ZoneId, armed: bool) -> bool {
        if !self.configured(zone) {
            return false;
        }
        let mask = zone.mask();
        let was = self.armed & mask != 0;

        if armed {
            self.armed |= mask;
        } else {
            self.armed &= !mask;
            self.triggered &= !mask;
            self.abnormal &= !mask;
            self.dwell[zone.index()].cancel();
        }

        if was != armed {
            info!("{zone}: {}", if armed { "armed" } else { "disarmed" });
        }
        was != armed
    }

    // ── queries ──────────────────────────────────────────────────

    pub fn armed(&self, zone: ZoneId) -> bool {
        self.configured(zone) && self.armed & zone.mask() != 0
    }

    pub fn triggered(&self, zone: ZoneId) -> bool {
        self.configured(zone) && self.triggered & zone.mask() != 0
    }

    /// Whether any sensor reported abnormal for this zone this scan.
    pub fn abnormal(&self, zone: ZoneId) -> bool {
        self.configured(zone) && self.abnormal & zone.mask() != 0
    }

    /// Pending minimum-dwell deadline; [`Deadline::NONE`] when idle.
    pub fn dwell(&self, zone: ZoneId) -> Deadline {
        if self.configured(zone) {
            self.dwell[zone.index()]
        } else {
            Deadline::NONE
        }
    }

    pub fn state(&self, zone: ZoneId) -> ZoneState {
        if !self.armed(zone) {
            ZoneState::Disarmed
        } else if self.abnormal(zone) {
            ZoneState::ArmedActive
        } else if self.triggered(zone) {
            ZoneState::ArmedDwell
        } else {
            ZoneState::ArmedIdle
        }
    }

    pub fn armed_mask(&self) -> u8 {
        self.armed
    }

    pub fn triggered_mask(&self) -> u8 {
        self.triggered
    }

    pub fn config(&self, zone: ZoneId) -> Option<&ZoneConfig> {
        self.zones.get(zone.index())
    }
}
