//! Side-start either-target routines
//!
//! The four side-start routines share one state machine parameterized
//! by start side and target priority. At plan-build time the routing
//! code picks between three outcomes: deliver to the near target,
//! deliver to the far target, or just cross the line. The choice is
//! recorded once and reused by the mechanism and eject stages.

use crate::platform::traits::TimerInterface;
use crate::platform::Result;
use crate::rover::{AutoInputs, TickOutput};
use crate::subsystems::mechanisms::{ArmLower, Eject, LiftRaiseArmLower};
use crate::subsystems::profile::Direction;

use super::{drive_tick, Priority, Routine, RoutineContext, RoutingCode, Side, Stage, Target, TURN_SPEED};

const CROSS_LINE_DISTANCE: f32 = 8.0;
const COMBINED_ARM_THRESHOLD: f32 = 6.0;
const EJECT_DURATION_MS: u64 = 2000;
const EJECT_SPEED_NEAR: f32 = 0.35;
const EJECT_SPEED_FAR: f32 = 1.0;

#[derive(Debug)]
pub struct SideStartRoutine {
    side: Side,
    priority: Priority,
    routing: RoutingCode,
    stage: Stage,
    choice: Target,
    eject: Eject,
}

impl SideStartRoutine {
    pub fn new(side: Side, priority: Priority, routing: RoutingCode) -> Self {
        Self {
            side,
            priority,
            routing,
            stage: Stage::BuildPlan,
            choice: Target::None,
            eject: Eject::new(EJECT_DURATION_MS, EJECT_SPEED_NEAR),
        }
    }

    /// Chosen target, for diagnostics
    pub fn choice(&self) -> Target {
        self.choice
    }

    fn arm_threshold(&self) -> f32 {
        // right-side near approach sits lower against the target wall
        if self.side == Side::Right && self.priority == Priority::SwitchFirst {
            3.0
        } else {
            4.0
        }
    }

    fn choose_target(&self) -> Target {
        let marker = self.side.routing_byte();
        match self.priority {
            Priority::SwitchFirst => {
                if self.routing.near() == marker {
                    Target::Switch
                } else if self.routing.far() == marker {
                    Target::Scale
                } else {
                    Target::None
                }
            }
            Priority::ScaleFirst => {
                if self.routing.far() == marker {
                    Target::Scale
                } else if self.routing.near() == marker {
                    Target::Switch
                } else {
                    Target::None
                }
            }
        }
    }

    fn build_plan(&mut self, ctx: &mut RoutineContext<'_>) -> Result<()> {
        ctx.engine.initialize();
        ctx.engine.clear_profile();
        self.choice = self.choose_target();

        let (turn_heading, turn_speed) = match self.side {
            Side::Left => (90.0, TURN_SPEED),
            Side::Right => (270.0, -TURN_SPEED),
        };
        // approach distances differ between the priority orders; the
        // scale-first paths line up for a lift-height delivery
        match (self.priority, self.choice) {
            (_, Target::None) => {
                ctx.engine.add_move(Direction::Forward, CROSS_LINE_DISTANCE)?;
            }
            (Priority::SwitchFirst, Target::Switch) => {
                ctx.engine.add_move(Direction::Forward, 13.0)?;
                ctx.engine.add_turn(turn_heading, turn_speed)?;
                ctx.engine.add_move(Direction::Forward, 2.0)?;
            }
            (Priority::SwitchFirst, Target::Scale) => {
                ctx.engine.add_move(Direction::Forward, 44.0)?;
                ctx.engine.add_turn(turn_heading, turn_speed)?;
            }
            (Priority::ScaleFirst, Target::Switch) => {
                ctx.engine.add_move(Direction::Forward, 18.0)?;
                ctx.engine.add_turn(turn_heading, turn_speed)?;
                ctx.engine.add_move(Direction::Forward, 2.8)?;
            }
            (Priority::ScaleFirst, Target::Scale) => {
                ctx.engine.add_move(Direction::Forward, 41.3)?;
                ctx.engine.add_turn(turn_heading, turn_speed)?;
            }
        }
        ctx.engine.loaded = true;
        crate::log_info!("{}: target {:?}", self.name(), self.choice);
        Ok(())
    }

    fn enter_eject(&mut self) {
        let speed = if self.choice == Target::Scale {
            EJECT_SPEED_FAR
        } else {
            EJECT_SPEED_NEAR
        };
        self.eject = Eject::new(EJECT_DURATION_MS, speed);
        self.stage = Stage::Eject;
    }
}

impl Routine for SideStartRoutine {
    fn name(&self) -> &'static str {
        match (self.side, self.priority) {
            (Side::Left, Priority::SwitchFirst) => "switch_or_scale_left",
            (Side::Right, Priority::SwitchFirst) => "switch_or_scale_right",
            (Side::Left, Priority::ScaleFirst) => "scale_or_switch_left",
            (Side::Right, Priority::ScaleFirst) => "scale_or_switch_right",
        }
    }

    fn update(
        &mut self,
        ctx: &mut RoutineContext<'_>,
        inputs: &AutoInputs,
        timer: &dyn TimerInterface,
    ) -> Result<TickOutput> {
        match self.stage {
            Stage::BuildPlan => {
                self.build_plan(ctx)?;
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
            Stage::Mechanism => match self.choice {
                Target::Switch => {
                    let cmd = ArmLower::new(self.arm_threshold())
                        .update(ctx.arm, inputs.arm_position);
                    if cmd.done {
                        self.enter_eject();
                    }
                    Ok(TickOutput {
                        arm: cmd.output,
                        ..TickOutput::neutral()
                    })
                }
                Target::Scale => {
                    let cmd = LiftRaiseArmLower::new(COMBINED_ARM_THRESHOLD).update(
                        ctx.arm,
                        inputs.arm_position,
                        inputs.lift_at_lower,
                        inputs.lift_at_upper,
                    );
                    if cmd.done {
                        self.enter_eject();
                    }
                    Ok(TickOutput {
                        arm: cmd.arm,
                        lift: cmd.lift,
                        ..TickOutput::neutral()
                    })
                }
                Target::None => {
                    self.enter_eject();
                    Ok(TickOutput::neutral())
                }
            },
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
