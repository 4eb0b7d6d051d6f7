//! Arm, lift, and gripper state machines
//!
//! Independent closed-loop routines driven by raw sensor readings and
//! composed by the rover sequencer. Each `update` is one tick: it
//! returns the actuator command for this tick plus a done flag, and
//! never blocks. Negative arm drive lowers the arm; negative lift
//! drive raises the carriage toward the upper limit.

use libm::fabsf;

use crate::platform::traits::TimerInterface;

/// Drive inputs inside this band command no motion
const DRIVE_DEADBAND: f32 = 0.15;

/// Lift drive used by the raise machines
pub const LIFT_RAISE_DRIVE: f32 = -0.75;

/// Arm drive used by the lowering machines
pub const ARM_LOWER_DRIVE: f32 = -0.5;

/// Arm geometry and speed band
///
/// Positions are potentiometer units over the arm's full travel.
/// Commanded motion is blocked outside [`position_min`, `position_max`]
/// and the speed factor tapers linearly near both mechanical extents.
#[derive(Debug, Clone, Copy)]
pub struct ArmConfig {
    pub position_min: f32,
    pub position_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Below this position the factor tapers as position / taper_low
    pub taper_low: f32,
    /// At or above this position the factor tapers toward full_travel
    pub taper_high: f32,
    pub full_travel: f32,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            position_min: 1.5,
            position_max: 7.5,
            speed_min: 0.0,
            speed_max: 1.0,
            taper_low: 2.0,
            taper_high: 10.0,
            full_travel: 12.0,
        }
    }
}

/// Position-tapered arm speed law
///
/// Negative drive lowers, positive raises. Motion is allowed only when
/// the drive exceeds the deadband and the position is inside the hard
/// band for that direction.
pub fn arm_speed(config: &ArmConfig, drive: f32, position: f32) -> f32 {
    let lowering = drive < -DRIVE_DEADBAND && position > config.position_min;
    let raising = drive > DRIVE_DEADBAND && position < config.position_max;
    if !lowering && !raising {
        return 0.0;
    }

    let mut factor = config.speed_max;
    if position >= config.taper_high {
        factor = (config.full_travel - position) / (config.full_travel - config.taper_high);
    }
    if position <= config.taper_low {
        factor = position / config.taper_low;
    }
    drive * factor.clamp(config.speed_min, config.speed_max)
}

/// Lift gating law: pass the drive through unless the limit switch in
/// the direction of travel is engaged
pub fn lift_speed(drive: f32, at_lower: bool, at_upper: bool) -> f32 {
    if (drive < 0.0 && !at_upper) || (drive > 0.0 && !at_lower) {
        drive
    } else {
        0.0
    }
}

/// One tick of a single-actuator machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MechanismCommand {
    pub output: f32,
    pub done: bool,
}

/// Timed crate ejection
///
/// Open loop: runs the gripper at |speed| until the duration has
/// elapsed since the first update, then stops and reports done.
#[derive(Debug)]
pub struct Eject {
    duration_ms: u64,
    speed: f32,
    started_at_us: Option<u64>,
}

impl Eject {
    pub fn new(duration_ms: u64, speed: f32) -> Self {
        Self {
            duration_ms,
            speed,
            started_at_us: None,
        }
    }

    pub fn update(&mut self, timer: &dyn TimerInterface) -> MechanismCommand {
        let now_us = timer.now_us();
        let started = *self.started_at_us.get_or_insert(now_us);
        let elapsed_ms = now_us.saturating_sub(started) / 1000;
        if elapsed_ms < self.duration_ms {
            MechanismCommand {
                output: fabsf(self.speed),
                done: false,
            }
        } else {
            MechanismCommand {
                output: 0.0,
                done: true,
            }
        }
    }
}

/// Lower the arm to a height threshold
#[derive(Debug, Clone, Copy)]
pub struct ArmLower {
    pub threshold: f32,
}

impl ArmLower {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn update(&self, config: &ArmConfig, position: f32) -> MechanismCommand {
        if position > self.threshold {
            MechanismCommand {
                output: arm_speed(config, ARM_LOWER_DRIVE, position),
                done: false,
            }
        } else {
            MechanismCommand {
                output: 0.0,
                done: true,
            }
        }
    }
}

/// Raise the lift until the upper limit switch engages
#[derive(Debug, Clone, Copy, Default)]
pub struct LiftRaise;

impl LiftRaise {
    pub fn update(&self, at_lower: bool, at_upper: bool) -> MechanismCommand {
        if !at_upper {
            MechanismCommand {
                output: lift_speed(LIFT_RAISE_DRIVE, at_lower, at_upper),
                done: false,
            }
        } else {
            MechanismCommand {
                output: 0.0,
                done: true,
            }
        }
    }
}

/// One tick of the combined lift-and-arm machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiftArmCommand {
    pub lift: f32,
    pub arm: f32,
    pub done: bool,
}

/// Raise the lift to its upper limit while lowering the arm to a
/// height threshold; done only when both have arrived
#[derive(Debug, Clone, Copy)]
pub struct LiftRaiseArmLower {
    pub arm_threshold: f32,
}

impl LiftRaiseArmLower {
    pub fn new(arm_threshold: f32) -> Self {
        Self { arm_threshold }
    }

    pub fn update(
        &self,
        config: &ArmConfig,
        position: f32,
        at_lower: bool,
        at_upper: bool,
    ) -> LiftArmCommand {
        let lift = if !at_upper {
            lift_speed(LIFT_RAISE_DRIVE, at_lower, at_upper)
        } else {
            0.0
        };
        let arm = if position > self.arm_threshold {
            arm_speed(config, ARM_LOWER_DRIVE, position)
        } else {
            0.0
        };
        LiftArmCommand {
            lift,
            arm,
            done: at_upper && position <= self.arm_threshold,
        }
    }
}
