//! Host time adapter.
//!
//! Implements [`Clock`] on top of `std::time::Instant`.  On a board the
//! same trait is backed by the MCU's millisecond tick.

use std::time::Instant;

use crate::app::ports::Clock;

/// Milliseconds since the clock was created.
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds since creation (monotonic).
    pub fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
