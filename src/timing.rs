//! Wrap-safe time arithmetic.
//!
//! The panel clock is a free-running `u32` counter (milliseconds for
//! dwell and blink timing, microseconds for LED phase holds) that wraps
//! at 2^32.  Every timeout in the crate goes through [`Deadline`] so the
//! comparison is written once, with the wrapped difference bounded by
//! [`MAX_TIMEOUT`].
//!
//! ```text
//!   now ───────────────▶ end            remaining = end - now (wrapping)
//!   │◀── 0 < remaining <= MAX_TIMEOUT ──▶│  pending
//!   end ◀─────────────── now            remaining ≈ 2^32 - small: elapsed
//! ```

/// Largest interval a [`Deadline`] may represent, in clock units.
///
/// A remaining time above this bound can only come from a deadline that
/// already passed (the wrapped difference is then close to 2^32), so it
/// is treated as elapsed instead of "far in the future".
pub const MAX_TIMEOUT: u32 = 1 << 24;

/// A single pending timeout.  A raw end of `0` means "nothing pending".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    end: u32,
}

impl Deadline {
    /// No pending timeout.
    pub const NONE: Self = Self { end: 0 };

    /// A deadline `duration` units after `now`.
    pub fn after(now: u32, duration: u32) -> Self {
        let mut d = Self::NONE;
        d.set(now, duration);
        d
    }

    /// Start (or restart) the timeout.
    pub fn set(&mut self, now: u32, duration: u32) {
        let end = now.wrapping_add(duration);
        // 0 is reserved for "nothing pending".
        self.end = if end == 0 { 1 } else { end };
    }

    /// Drop any pending timeout.
    pub fn cancel(&mut self) {
        self.end = 0;
    }

    /// Whether a timeout has been set and not yet cancelled.
    pub fn is_set(&self) -> bool {
        self.end != 0
    }

    /// True once `now` has reached the end, or when nothing is pending.
    pub fn has_elapsed(&self, now: u32) -> bool {
        self.remaining(now) == 0
    }

    /// Units left until the end; `0` once elapsed or when unset.
    pub fn remaining(&self, now: u32) -> u32 {
        if self.end == 0 {
            return 0;
        }
        let remaining = self.end.wrapping_sub(now);
        if remaining <= MAX_TIMEOUT {
            remaining
        } else {
            0
        }
    }

    /// Raw end timestamp (`0` when unset).
    pub fn raw(&self) -> u32 {
        self.end
    }
}
