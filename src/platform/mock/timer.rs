//! Mock Timer implementation for testing

use crate::platform::traits::TimerInterface;

/// Mock Timer implementation
///
/// Uses simulated time advanced explicitly by the test. For actual
/// timing tests, use platform-specific timers.
#[derive(Debug)]
pub struct MockTimer {
    current_time_us: u64,
}

impl MockTimer {
    /// Create a new mock timer at time zero
    pub fn new() -> Self {
        Self { current_time_us: 0 }
    }

    /// Advance simulated time by the given number of microseconds
    pub fn advance_us(&mut self, us: u64) {
        self.current_time_us = self.current_time_us.wrapping_add(us);
    }

    /// Advance simulated time by the given number of milliseconds
    pub fn advance_ms(&mut self, ms: u64) {
        self.advance_us(ms.saturating_mul(1000));
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerInterface for MockTimer {
    fn now_us(&self) -> u64 {
        self.current_time_us
    }
}
