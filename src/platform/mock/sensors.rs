//! Mock sensor suite implementation for testing

use crate::platform::traits::SensorSuite;
use crate::platform::{Result, SensorError};

/// Mock sensor suite
///
/// All readings are public fields the test sets directly. Setting
/// `fail_reads` makes every read return `SensorError::ReadFailed`,
/// which exercises the sequencer's neutral-output fallback.
#[derive(Debug)]
pub struct MockSensors {
    pub heading_deg: f32,
    pub distance: f32,
    pub arm_position: f32,
    pub lift_at_upper: bool,
    pub lift_at_lower: bool,
    pub fail_reads: bool,
}

impl MockSensors {
    /// Create a mock suite with all readings at rest
    pub fn new() -> Self {
        Self {
            heading_deg: 0.0,
            distance: 0.0,
            arm_position: 0.0,
            lift_at_upper: false,
            lift_at_lower: false,
            fail_reads: false,
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail_reads {
            return Err(SensorError::ReadFailed.into());
        }
        Ok(())
    }
}

impl Default for MockSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSuite for MockSensors {
    fn heading_deg(&self) -> Result<f32> {
        self.check()?;
        Ok(self.heading_deg)
    }

    fn distance(&self) -> Result<f32> {
        self.check()?;
        Ok(self.distance)
    }

    fn arm_position(&self) -> Result<f32> {
        self.check()?;
        Ok(self.arm_position)
    }

    fn lift_at_upper(&self) -> Result<bool> {
        self.check()?;
        Ok(self.lift_at_upper)
    }

    fn lift_at_lower(&self) -> Result<bool> {
        self.check()?;
        Ok(self.lift_at_lower)
    }
}
