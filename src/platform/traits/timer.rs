//! Timer interface trait
//!
//! This module defines the monotonic clock interface the control core
//! consumes. The core never sleeps; timed behaviors (pauses, timed
//! ejection) capture a timestamp at stage entry and compare elapsed
//! time on each tick.

/// Monotonic clock interface
///
/// Platform implementations must provide this interface for timing.
///
/// # Safety Invariants
///
/// - `now_us` must be monotonically non-decreasing
/// - The clock must not be reset while a routine is running
pub trait TimerInterface {
    /// Get current time in microseconds since an arbitrary epoch
    fn now_us(&self) -> u64;

    /// Get current time in milliseconds since the same epoch
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
