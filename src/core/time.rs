//! Monotonic event timestamps.
//!
//! Protocol events carry 32-bit millisecond timestamps. The clock is
//! monotonic so grab/focus ordering comparisons stay valid across the
//! lifetime of the process.

use std::time::Instant;

/// Millisecond clock anchored at compositor startup.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    /// Milliseconds since startup, truncated to the protocol's 32 bits.
    pub fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
