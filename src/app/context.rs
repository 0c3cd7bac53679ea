//! Per-scan context threaded through every engine component.
//!
//! `ScanContext` replaces module-level state: the clock readings for this
//! scan, the running scan count and the trace verbosity.  The
//! [`ScanEngine`](super::service::ScanEngine) builds a fresh one at the
//! start of every scan; components read it and never keep a copy.

use crate::config::TraceLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanContext {
    /// Millisecond clock at the start of the scan.
    pub now_ms: u32,
    /// Microsecond clock at the start of the scan.
    pub now_us: u32,
    /// Scans completed before this one (wraps).
    pub scan: u32,
    pub trace: TraceLevel,
}

impl ScanContext {
    pub fn new(now_ms: u32, now_us: u32, scan: u32, trace: TraceLevel) -> Self {
        Self {
            now_ms,
            now_us,
            scan,
            trace,
        }
    }

    /// Context at a bare millisecond timestamp, for driving components
    /// individually.
    pub fn at(now_ms: u32) -> Self {
        Self::new(now_ms, now_ms.wrapping_mul(1000), 0, TraceLevel::Off)
    }

    /// Whether events at `level` should be reported.
    pub fn traces(&self, level: TraceLevel) -> bool {
        self.trace != TraceLevel::Off && self.trace >= level
    }
}
