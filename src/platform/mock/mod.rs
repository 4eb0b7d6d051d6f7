//! Mock platform implementations for testing
//!
//! Simulated sensors and clock used by the host test suites. No
//! embedded target implementation ships in this crate.

pub mod sensors;
pub mod timer;

pub use sensors::MockSensors;
pub use timer::MockTimer;
