//! Autonomous sequencer
//!
//! Ties the control core together: reads the sensor suite, dispatches
//! the active routine, and returns one [`TickOutput`] of actuator
//! commands per tick. Any sensor failure degrades that tick to neutral
//! output with a diagnostic; the loop never stops ticking.

pub mod routine;

pub use routine::{Priority, Routine, RoutingCode, Side, Stage, Target};

use libm::fabsf;

use crate::libraries::curvature_drive::CurvatureDrive;
use crate::platform::traits::{SensorSuite, TimerInterface};
use crate::platform::Result;
use crate::subsystems::mechanisms::ArmConfig;
use crate::subsystems::profile::{ProfileConfig, ProfileEngine};
use routine::{CenterStartRoutine, RoutineContext, SideStartRoutine, StraightRoutine};

/// Cruise speed cap used by the delivery routines
const ROUTINE_MAX_SPEED: f32 = 0.75;

/// Actuator commands for one tick, all in [-1, 1]
///
/// Returned to the caller for actuation; the core owns no actuators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    pub left: f32,
    pub right: f32,
    pub arm: f32,
    pub lift: f32,
    pub grip: f32,
}

impl TickOutput {
    pub const fn neutral() -> Self {
        Self {
            left: 0.0,
            right: 0.0,
            arm: 0.0,
            lift: 0.0,
            grip: 0.0,
        }
    }
}

/// Sensor readings for one tick, already validated
#[derive(Debug, Clone, Copy)]
pub struct AutoInputs {
    pub heading: f32,
    /// Absolute value of the odometry reading
    pub distance: f32,
    pub arm_position: f32,
    pub lift_at_upper: bool,
    pub lift_at_lower: bool,
}

/// Which autonomous routine to run, selected by the host before the
/// session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineId {
    /// Drive straight across the line
    CrossLine,
    /// Deliver to the near target from the center start
    CenterSwitch,
    /// Near target preferred, far as fallback, left start
    SwitchOrScaleLeft,
    /// Near target preferred, far as fallback, right start
    SwitchOrScaleRight,
    /// Far target preferred, near as fallback, left start
    ScaleOrSwitchLeft,
    /// Far target preferred, near as fallback, right start
    ScaleOrSwitchRight,
}

#[derive(Debug)]
enum ActiveRoutine {
    Straight(StraightRoutine),
    Center(CenterStartRoutine),
    Side(SideStartRoutine),
}

impl ActiveRoutine {
    fn as_routine(&mut self) -> &mut dyn Routine {
        match self {
            ActiveRoutine::Straight(r) => r,
            ActiveRoutine::Center(r) => r,
            ActiveRoutine::Side(r) => r,
        }
    }
}

/// Autonomous sequencer
///
/// Owns the profile engine, the drive model, the arm configuration,
/// and the active routine for one autonomous session. Create a fresh
/// sequencer at each session start.
#[derive(Debug)]
pub struct Sequencer {
    engine: ProfileEngine,
    drive: CurvatureDrive,
    arm: ArmConfig,
    routine: ActiveRoutine,
}

impl Sequencer {
    pub fn new(id: RoutineId, routing: RoutingCode) -> Self {
        let config = ProfileConfig {
            max_speed: ROUTINE_MAX_SPEED,
            ..ProfileConfig::default()
        };
        let routine = match id {
            RoutineId::CrossLine => ActiveRoutine::Straight(StraightRoutine::new()),
            RoutineId::CenterSwitch => ActiveRoutine::Center(CenterStartRoutine::new(routing)),
            RoutineId::SwitchOrScaleLeft => ActiveRoutine::Side(SideStartRoutine::new(
                Side::Left,
                Priority::SwitchFirst,
                routing,
            )),
            RoutineId::SwitchOrScaleRight => ActiveRoutine::Side(SideStartRoutine::new(
                Side::Right,
                Priority::SwitchFirst,
                routing,
            )),
            RoutineId::ScaleOrSwitchLeft => ActiveRoutine::Side(SideStartRoutine::new(
                Side::Left,
                Priority::ScaleFirst,
                routing,
            )),
            RoutineId::ScaleOrSwitchRight => ActiveRoutine::Side(SideStartRoutine::new(
                Side::Right,
                Priority::ScaleFirst,
                routing,
            )),
        };
        Self {
            engine: ProfileEngine::new(config),
            drive: CurvatureDrive::new(),
            arm: ArmConfig::default(),
            routine,
        }
    }

    /// Live tuning access to the profile engine
    pub fn engine_mut(&mut self) -> &mut ProfileEngine {
        &mut self.engine
    }

    /// Live tuning access to the drive model
    pub fn drive_mut(&mut self) -> &mut CurvatureDrive {
        &mut self.drive
    }

    /// Run one control tick
    ///
    /// This is the single per-tick entry point; the host calls it once
    /// per fixed period and applies the returned commands.
    pub fn tick(&mut self, sensors: &dyn SensorSuite, timer: &dyn TimerInterface) -> TickOutput {
        match self.try_tick(sensors, timer) {
            Ok(output) => output,
            Err(e) => {
                crate::log_error!("tick degraded to neutral output: {:?}", e);
                TickOutput::neutral()
            }
        }
    }

    fn try_tick(
        &mut self,
        sensors: &dyn SensorSuite,
        timer: &dyn TimerInterface,
    ) -> Result<TickOutput> {
        let inputs = AutoInputs {
            heading: sensors.heading_deg()?,
            distance: fabsf(sensors.distance()?),
            arm_position: sensors.arm_position()?,
            lift_at_upper: sensors.lift_at_upper()?,
            lift_at_lower: sensors.lift_at_lower()?,
        };
        let mut ctx = RoutineContext {
            engine: &mut self.engine,
            drive: &self.drive,
            arm: &self.arm,
        };
        self.routine.as_routine().update(&mut ctx, &inputs, timer)
    }
}
