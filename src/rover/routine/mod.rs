//! Autonomous routines
//!
//! Each routine is a small finite state machine: build a step plan once
//! from the field routing code, drive it to completion, run the
//! mechanism machines, then hold a safe idle state. One routine is
//! active per autonomous session.

pub mod center_start;
pub mod side_start;
pub mod straight;

pub use center_start::CenterStartRoutine;
pub use side_start::SideStartRoutine;
pub use straight::StraightRoutine;

use crate::libraries::curvature_drive::CurvatureDrive;
use crate::platform::traits::TimerInterface;
use crate::platform::Result;
use crate::rover::{AutoInputs, TickOutput};
use crate::subsystems::mechanisms::ArmConfig;
use crate::subsystems::profile::ProfileEngine;

/// Turn speed magnitude used by every routine's plan
pub const TURN_SPEED: f32 = 0.5;

/// Routine stage
///
/// Not every routine visits every stage; `Idle` is terminal and safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    BuildPlan,
    Drive,
    Mechanism,
    Eject,
    Idle,
}

/// Delivery target chosen at plan-build time and persisted for the
/// life of the routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Target {
    None,
    Switch,
    Scale,
}

/// Which side of the field the vehicle starts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Routing character that assigns a target to this side
    pub fn routing_byte(self) -> u8 {
        match self {
            Side::Left => b'L',
            Side::Right => b'R',
        }
    }
}

/// Which target a side-start routine tries first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    SwitchFirst,
    ScaleFirst,
}

/// Two-character field routing code
///
/// The first character assigns the near target, the second the far
/// target. Only `L`/`R` match a side; any other byte matches neither,
/// so a malformed code degrades to the no-target plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingCode {
    bytes: [u8; 2],
}

impl RoutingCode {
    pub const fn new(near: u8, far: u8) -> Self {
        Self { bytes: [near, far] }
    }

    /// Build from a field message, taking the first two characters
    pub fn from_message(message: &str) -> Self {
        let mut bytes = [0u8; 2];
        for (slot, b) in bytes.iter_mut().zip(message.bytes()) {
            *slot = b;
        }
        Self { bytes }
    }

    pub fn near(&self) -> u8 {
        self.bytes[0]
    }

    pub fn far(&self) -> u8 {
        self.bytes[1]
    }
}

/// Shared resources a routine borrows for one tick
pub struct RoutineContext<'a> {
    pub engine: &'a mut ProfileEngine,
    pub drive: &'a CurvatureDrive,
    pub arm: &'a ArmConfig,
}

/// One autonomous routine
pub trait Routine {
    fn name(&self) -> &'static str;

    /// Run one tick; called exactly once per scheduler period
    fn update(
        &mut self,
        ctx: &mut RoutineContext<'_>,
        inputs: &AutoInputs,
        timer: &dyn TimerInterface,
    ) -> Result<TickOutput>;
}

/// One tick of the drive stage
///
/// Returns the wheel commands while the plan is still executing, or
/// `None` once it has completed.
pub(crate) fn drive_tick(
    ctx: &mut RoutineContext<'_>,
    inputs: &AutoInputs,
    timer: &dyn TimerInterface,
) -> Option<TickOutput> {
    if ctx.engine.loaded && !ctx.engine.is_completed() {
        let profile = ctx.engine.execute(inputs.heading, inputs.distance, timer);
        let wheels = ctx.drive.actuator_commands(profile.speed, profile.curvature);
        Some(TickOutput {
            left: wheels.left,
            right: wheels.right,
            ..TickOutput::neutral()
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Routing Code Tests ==========

    #[test]
    fn test_from_message_takes_two_bytes() {
        let code = RoutingCode::from_message("LRL");
        assert_eq!(code.near(), b'L');
        assert_eq!(code.far(), b'R');
    }

    #[test]
    fn test_short_message_matches_neither_side() {
        let code = RoutingCode::from_message("L");
        assert_eq!(code.near(), b'L');
        assert_ne!(code.far(), Side::Left.routing_byte());
        assert_ne!(code.far(), Side::Right.routing_byte());
    }

    #[test]
    fn test_routing_bytes() {
        assert_eq!(Side::Left.routing_byte(), b'L');
        assert_eq!(Side::Right.routing_byte(), b'R');
    }
}
