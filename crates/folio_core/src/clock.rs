//! Time sources
//!
//! Everything time-dependent in Folio reads milliseconds from a [`Clock`].
//! Production code uses [`SystemClock`]; tests and the CLI simulation drive a
//! [`ManualClock`] so that timer behaviour is fully deterministic.

use std::cell::Cell;
use std::time::Instant;

/// A monotonic millisecond time source
pub trait Clock {
    /// Milliseconds elapsed since the clock's origin
    fn now_ms(&self) -> u64;
}

/// Wall-clock time measured from the moment the clock was created
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// A clock that only moves when told to
///
/// # Example
///
/// ```rust
/// use folio_core::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock that starts at the given time
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    /// Move time forward by `ms` milliseconds
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set(&self, now_ms: u64) {
        if now_ms > self.now.get() {
            self.now.set(now_ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
