//! Platform abstraction traits
//!
//! This module defines the traits that host platforms must provide.

pub mod sensors;
pub mod timer;

// Re-export trait interfaces
pub use sensors::SensorSuite;
pub use timer::TimerInterface;
