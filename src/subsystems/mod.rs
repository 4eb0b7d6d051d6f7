//! Subsystems
//!
//! Tick-driven building blocks composed by the rover sequencer.

pub mod mechanisms;
pub mod profile;
