//! Cross-the-line routine
//!
//! The simplest routine: a single fixed-length forward move, no
//! mechanism work.

use crate::platform::traits::TimerInterface;
use crate::platform::Result;
use crate::rover::{AutoInputs, TickOutput};
use crate::subsystems::profile::Direction;

use super::{drive_tick, Routine, RoutineContext, Stage};

/// Length of the move that clears the line
const CROSS_LINE_DISTANCE: f32 = 8.0;

#[derive(Debug)]
pub struct StraightRoutine {
    stage: Stage,
}

impl StraightRoutine {
    pub fn new() -> Self {
        Self {
            stage: Stage::BuildPlan,
        }
    }
}

impl Default for StraightRoutine {
    fn default() -> Self {
        Self::new()
    }
}

impl Routine for StraightRoutine {
    fn name(&self) -> &'static str {
        "cross_line"
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
                ctx.engine.add_move(Direction::Forward, CROSS_LINE_DISTANCE)?;
                ctx.engine.loaded = true;
                self.stage = Stage::Drive;
                Ok(TickOutput::neutral())
            }
            Stage::Drive => match drive_tick(ctx, inputs, timer) {
                Some(output) => Ok(output),
                None => {
                    self.stage = Stage::Idle;
                    crate::log_info!("{} completed", self.name());
                    Ok(TickOutput::neutral())
                }
            },
            _ => Ok(TickOutput::neutral()),
        }
    }
}
