//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// Host implementations map their sensor/clock failures to these
/// variants. The sequencer reduces any of them to a neutral output for
/// the tick on which they occur; they never stop the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// Sensor read failed
    Sensor(SensorError),
    /// Clock/timer operation failed
    Timer(TimerError),
    /// Invalid configuration or request (e.g. step plan capacity exceeded)
    InvalidConfig,
}

/// Sensor-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Device has not produced a sample yet
    NotReady,
    /// Read returned a value outside the calibrated range
    OutOfRange,
    /// Transfer from the device failed
    ReadFailed,
}

/// Timer-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Counter overflow
    Overflow,
    /// Invalid duration
    InvalidDuration,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Sensor(e) => write!(f, "sensor error: {:?}", e),
            PlatformError::Timer(e) => write!(f, "timer error: {:?}", e),
            PlatformError::InvalidConfig => write!(f, "invalid configuration"),
        }
    }
}

impl From<SensorError> for PlatformError {
    fn from(e: SensorError) -> Self {
        PlatformError::Sensor(e)
    }
}

impl From<TimerError> for PlatformError {
    fn from(e: TimerError) -> Self {
        PlatformError::Timer(e)
    }
}
