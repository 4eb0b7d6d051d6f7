//! Center-start delivery routine
//!
//! Starts on the center line and delivers one crate to whichever side
//! of the near target the routing code assigns, then lowers the arm
//! and ejects.

use crate::platform::traits::TimerInterface;
use crate::platform::Result;
use crate::rover::{AutoInputs, TickOutput};
use crate::subsystems::mechanisms::{ArmLower, Eject};
use crate::subsystems::profile::Direction;

use super::{drive_tick, Routine, RoutineContext, RoutingCode, Stage, TURN_SPEED};

const ARM_THRESHOLD: f32 = 4.0;
const EJECT_DURATION_MS: u64 = 2000;
const EJECT_SPEED: f32 = 0.35;

#[derive(Debug)]
pub struct CenterStartRoutine {
    routing: RoutingCode,
    stage: Stage,
    arm_lower: ArmLower,
    eject: Eject,
}

impl CenterStartRoutine {
    pub fn new(routing: RoutingCode) -> Self {
        Self {
            routing,
            stage: Stage::BuildPlan,
            arm_lower: ArmLower::new(ARM_THRESHOLD),
            eject: Eject::new(EJECT_DURATION_MS, EJECT_SPEED),
        }
    }
}

impl Routine for CenterStartRoutine {
    fn name(&self) -> &'static str {
        "center_switch"
    }

    fn update(
        &mut self,
        ctx: &mut RoutineContext<'_>,
        inputs: &AutoInputs,
        timer: &dyn TimerInterface,
    ) -> Result<TickOutput> {
        match self.stage {
            Stage::BuildPlan => {
                ctx.engine.initialize();
                ctx.engine.clear_profile();
                ctx.engine.add_move(Direction::Forward, 2.5)?;
                if self.routing.near() == b'L' {
                    ctx.engine.add_turn(315.0, -TURN_SPEED)?;
                    ctx.engine.add_move(Direction::Forward, 6.3)?;
                    ctx.engine.add_turn(0.0, TURN_SPEED)?;
                } else {
                    ctx.engine.add_turn(35.0, TURN_SPEED)?;
                    ctx.engine.add_move(Direction::Forward, 5.5)?;
                    ctx.engine.add_turn(0.0, -TURN_SPEED)?;
                }
                ctx.engine.loaded = true;
                self.stage = Stage::Drive;
                Ok(TickOutput::neutral())
            }
            Stage::Drive => match drive_tick(ctx, inputs, timer) {
                Some(output) => Ok(output),
                None => {
                    self.stage = Stage::Mechanism;
                    Ok(TickOutput::neutral())
                }
            },
            Stage::Mechanism => {
                let cmd = self.arm_lower.update(ctx.arm, inputs.arm_position);
                if cmd.done {
                    self.stage = Stage::Eject;
                }
                Ok(TickOutput {
                    arm: cmd.output,
                    ..TickOutput::neutral()
                })
            }
            Stage::Eject => {
                let cmd = self.eject.update(timer);
                if cmd.done {
                    self.stage = Stage::Idle;
                    crate::log_info!("{} completed", self.name());
                }
                Ok(TickOutput {
                    grip: cmd.output,
                    ..TickOutput::neutral()
                })
            }
            Stage::Idle => Ok(TickOutput::neutral()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::curvature_drive::CurvatureDrive;
    use crate::platform::mock::MockTimer;
    use crate::subsystems::mechanisms::ArmConfig;
    use crate::subsystems::profile::{ProfileEngine, StepKind};

    fn build_plan(routing: RoutingCode) -> ProfileEngine {
        let mut engine = ProfileEngine::default();
        let drive = CurvatureDrive::new();
        let arm = ArmConfig::default();
        let timer = MockTimer::new();
        let mut routine = CenterStartRoutine::new(routing);
        let inputs = AutoInputs {
            heading: 0.0,
            distance: 0.0,
            arm_position: 7.5,
            lift_at_upper: false,
            lift_at_lower: false,
        };
        let mut ctx = RoutineContext {
            engine: &mut engine,
            drive: &drive,
            arm: &arm,
        };
        routine.update(&mut ctx, &inputs, &timer).unwrap();
        engine
    }

    fn turn_target(engine: &ProfileEngine, index: usize) -> f32 {
        match engine.step(index).unwrap().kind {
            StepKind::Turn { target_heading, .. } => target_heading,
            other => panic!("expected turn at {}, got {:?}", index, other),
        }
    }

    #[test]
    fn test_left_plate_plan() {
        let engine = build_plan(RoutingCode::new(b'L', b'R'));
        assert_eq!(engine.plan_len(), 4);
        assert_eq!(turn_target(&engine, 1), 315.0);
        assert_eq!(turn_target(&engine, 3), 0.0);
    }

    #[test]
    fn test_right_plate_plan() {
        let engine = build_plan(RoutingCode::new(b'R', b'L'));
        assert_eq!(engine.plan_len(), 4);
        assert_eq!(turn_target(&engine, 1), 35.0);
    }

    #[test]
    fn test_unknown_code_takes_right_branch() {
        let engine = build_plan(RoutingCode::new(b'?', b'?'));
        assert_eq!(turn_target(&engine, 1), 35.0);
    }
}
