//! Sensor suite trait
//!
//! This module defines the sensor readings the autonomous core consumes
//! each tick. Unit conversion from raw devices (encoder pulses to
//! distance, gyro integration to heading) happens on the host side;
//! the core sees calibrated values only.

use crate::platform::Result;

/// Sensor readings consumed by the autonomous sequencer
///
/// All reads are fallible. A failed read on any tick degrades that tick
/// to neutral output; it never stops the control loop.
///
/// # Safety Invariants
///
/// - `distance` must be monotonic per direction of travel between
///   profile re-initializations
/// - Limit switch readings are normalized: `true` means the switch is
///   engaged (carriage at the hard limit)
pub trait SensorSuite {
    /// Current vehicle heading in degrees, wrapped to [0, 360)
    fn heading_deg(&self) -> Result<f32>;

    /// Signed traveled distance in length units
    fn distance(&self) -> Result<f32>;

    /// Arm position from the potentiometer, in length units
    fn arm_position(&self) -> Result<f32>;

    /// Whether the lift carriage is at the upper hard limit
    fn lift_at_upper(&self) -> Result<bool>;

    /// Whether the lift carriage is at the lower hard limit
    fn lift_at_lower(&self) -> Result<bool>;
}
