#![cfg_attr(not(test), no_std)]

//! cratebot - autonomous control core for a differential-drive
//! crate-delivery rover
//!
//! This library contains the tick-driven autonomous core: a motion
//! profile engine that executes pre-programmed step plans (moves,
//! turns, pauses, curves), a curvature-based steering model that turns
//! (speed, curvature) commands into per-side wheel commands, and a
//! family of routine state machines that sequence driving with the
//! arm/lift/gripper mechanisms based on field routing data.
//!
//! The host is expected to call [`rover::Sequencer::tick`] once per
//! fixed control period (20 ms on the reference vehicle) and apply the
//! returned commands to the actuators. Nothing in this crate blocks,
//! sleeps, or runs off-tick.

// Platform abstraction layer (sensor/clock traits + mocks for host tests)
pub mod platform;

// Core systems (logging)
pub mod core;

// Vehicle-agnostic libraries (PID, curvature drive kinematics)
pub mod libraries;

// Subsystems (motion profile engine, auxiliary mechanisms)
pub mod subsystems;

// Rover autonomous sequencer and routines
pub mod rover;
