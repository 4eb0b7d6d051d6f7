//! Motion profile engine
//!
//! Stores an ordered plan of motion steps (Move, Turn, Pause, Curve)
//! and executes it one tick at a time from heading and distance
//! feedback. [`ProfileEngine::execute`] is called once per scheduler
//! tick and returns a (speed, curvature) command pair for the drive
//! model; it never blocks.
//!
//! Sign convention: forward legs carry negative speed magnitudes and
//! turns always command a forward (negative) speed on the outside
//! wheel. The drive model's right-side polarity inversion completes the
//! convention.

pub mod heading;
pub mod step;
pub mod trapezoid;

pub use heading::{heading_error, wrap_180};
pub use step::{Direction, Step, StepKind, PLAN_CAPACITY};
pub use trapezoid::{Trapezoid, TrapezoidOutput};

use heapless::Vec;
use libm::fabsf;

use crate::libraries::pid::{Pid, PidGains};
use crate::platform::traits::TimerInterface;
use crate::platform::{PlatformError, Result};

/// A turn step completes when the remaining error drops below this
const TURN_DONE_ERROR_DEG: f32 = 2.0;

/// Minimum turn speed magnitude, so the vehicle never stalls mid-turn
const MIN_TURN_RAMP: f32 = 0.25;

/// Engine tuning surface
///
/// All fields may be adjusted live between ticks; the PID gains are
/// read on every update.
#[derive(Debug, Clone, Copy)]
pub struct ProfileConfig {
    /// Move speed magnitude at the profile corners
    pub min_speed: f32,
    /// Move speed magnitude in the cruise zone
    pub max_speed: f32,
    /// Steering-hold gains; the sign of kp is flipped by the engine to
    /// match the direction of each Move/Curve leg
    pub steer_gains: PidGains,
    /// Turn-rate gains; kp is forced positive at each Turn start
    pub turn_gains: PidGains,
    /// Spatial quantum of the trapezoid generator, in length units
    pub slice_size: f32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            min_speed: 0.35,
            max_speed: 1.0,
            steer_gains: PidGains::p(-0.01),
            turn_gains: PidGains::p(0.05),
            slice_size: 1.0 / 48.0,
        }
    }
}

/// Per-tick engine output, both values in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileOutput {
    pub speed: f32,
    pub curvature: f32,
}

impl ProfileOutput {
    pub const fn neutral() -> Self {
        Self {
            speed: 0.0,
            curvature: 0.0,
        }
    }
}

/// Motion profile engine
///
/// Owns the step plan, the trapezoid scratch state, and the two PID
/// controllers (steering-hold for straight legs, turn-rate for turns).
#[derive(Debug)]
pub struct ProfileEngine {
    pub config: ProfileConfig,
    /// Plan is ready to execute
    pub loaded: bool,
    /// Suppress deceleration to zero between adjacent non-pause moves
    pub continuous: bool,
    steps: Vec<Step, PLAN_CAPACITY>,
    index: usize,
    completed: bool,
    start_distance: f32,
    move_start_heading: f32,
    turn_start_error: f32,
    pause_started_at_us: u64,
    trapezoid: Trapezoid,
    steer_pid: Pid,
    turn_pid: Pid,
}

impl Default for ProfileEngine {
    fn default() -> Self {
        Self::new(ProfileConfig::default())
    }
}

impl ProfileEngine {
    pub fn new(config: ProfileConfig) -> Self {
        Self {
            config,
            loaded: false,
            continuous: false,
            steps: Vec::new(),
            index: 0,
            completed: false,
            start_distance: 0.0,
            move_start_heading: 0.0,
            turn_start_error: 0.0,
            pause_started_at_us: 0,
            trapezoid: Trapezoid::new(),
            steer_pid: Pid::new(),
            turn_pid: Pid::new(),
        }
    }

    /// Reset execution state and both PID controllers
    ///
    /// The step plan itself is kept; use [`clear_profile`](Self::clear_profile)
    /// to discard it.
    pub fn initialize(&mut self) {
        self.loaded = false;
        self.continuous = false;
        self.completed = false;
        self.index = 0;
        self.start_distance = 0.0;
        self.move_start_heading = 0.0;
        self.turn_start_error = 0.0;
        self.steer_pid.reset();
        self.turn_pid.reset();
    }

    /// Empty the step plan and reset execution state
    pub fn clear_profile(&mut self) {
        self.steps.clear();
        self.loaded = false;
        self.continuous = false;
        self.completed = false;
        self.index = 0;
        self.start_distance = 0.0;
        self.move_start_heading = 0.0;
    }

    /// Append a straight move; returns the new plan length
    pub fn add_move(&mut self, direction: Direction, target_distance: f32) -> Result<usize> {
        let (min_speed, max_speed) = self.signed_speeds(direction);
        self.push(StepKind::Move {
            target_distance,
            min_speed,
            max_speed,
        })
    }

    /// Append a turn to an absolute heading; negative speed turns left
    pub fn add_turn(&mut self, target_heading: f32, turn_speed: f32) -> Result<usize> {
        self.push(StepKind::Turn {
            target_heading,
            turn_speed,
        })
    }

    /// Append a timed pause
    pub fn add_pause(&mut self, duration_ms: u64) -> Result<usize> {
        self.push(StepKind::Pause { duration_ms })
    }

    /// Append a fixed-curvature arc; returns the new plan length
    pub fn add_curve(
        &mut self,
        direction: Direction,
        target_distance: f32,
        curvature: f32,
    ) -> Result<usize> {
        let (min_speed, max_speed) = self.signed_speeds(direction);
        self.push(StepKind::Curve {
            target_distance,
            min_speed,
            max_speed,
            curvature,
        })
    }

    /// True once the index has advanced past the last step
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Index of the active step
    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn plan_len(&self) -> usize {
        self.steps.len()
    }

    /// Inspect a step and its execution flags
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Execute one tick of the active step
    ///
    /// `heading` in degrees [0, 360), `distance` in length units
    /// (callers feed the absolute value of the odometry reading).
    pub fn execute(
        &mut self,
        heading: f32,
        distance: f32,
        timer: &dyn TimerInterface,
    ) -> ProfileOutput {
        let mut output = ProfileOutput::neutral();

        if self.index < self.steps.len() {
            let step = self.steps[self.index];
            output = match step.kind {
                StepKind::Move {
                    target_distance,
                    min_speed,
                    max_speed,
                } => self.run_move(
                    heading,
                    distance,
                    target_distance,
                    min_speed,
                    max_speed,
                    None,
                    timer,
                ),
                StepKind::Curve {
                    target_distance,
                    min_speed,
                    max_speed,
                    curvature,
                } => self.run_move(
                    heading,
                    distance,
                    target_distance,
                    min_speed,
                    max_speed,
                    Some(curvature),
                    timer,
                ),
                StepKind::Turn {
                    target_heading,
                    turn_speed,
                } => self.run_turn(heading, target_heading, turn_speed),
                StepKind::Pause { duration_ms } => self.run_pause(duration_ms, timer),
            };
        }

        self.completed = self.index >= self.steps.len();
        output
    }

    #[allow(clippy::too_many_arguments)]
    fn run_move(
        &mut self,
        heading: f32,
        distance: f32,
        target_distance: f32,
        min_speed: f32,
        max_speed: f32,
        fixed_curvature: Option<f32>,
        timer: &dyn TimerInterface,
    ) -> ProfileOutput {
        if !self.steps[self.index].started {
            self.steps[self.index].started = true;
            self.start_distance = distance;
            // steering gain sign follows the direction of travel
            self.config.steer_gains.kp = if max_speed < 0.0 {
                -fabsf(self.config.steer_gains.kp)
            } else {
                fabsf(self.config.steer_gains.kp)
            };
            let last_speed = self.blend_speed(self.index.checked_sub(1));
            let next_speed = self.blend_speed(self.index.checked_add(1));
            self.trapezoid.set(
                target_distance,
                self.config.slice_size,
                min_speed,
                max_speed,
                last_speed,
                next_speed,
                timer.now_us(),
            );
            self.move_start_heading = heading;
            crate::log_debug!(
                "step {} move start: target {} heading {}",
                self.index,
                target_distance,
                heading
            );
        }

        if !self.steps[self.index].done {
            let cur_distance = distance - self.start_distance;
            let curvature = match fixed_curvature {
                Some(ratio) => ratio.clamp(-1.0, 1.0),
                None => {
                    let cur_error = heading_error(heading, self.move_start_heading);
                    self.steer_pid
                        .update(&self.config.steer_gains, 0.0, cur_error)
                        .clamp(-1.0, 1.0)
                }
            };
            let trap = self.trapezoid.evaluate(cur_distance, timer.now_us());
            if trap.done {
                self.steps[self.index].done = true;
            }
            ProfileOutput {
                speed: trap.speed.clamp(-1.0, 1.0),
                curvature,
            }
        } else {
            crate::log_debug!("step {} move done at heading {}", self.index, heading);
            self.index += 1;
            ProfileOutput::neutral()
        }
    }

    fn run_turn(&mut self, heading: f32, target_heading: f32, turn_speed: f32) -> ProfileOutput {
        if !self.steps[self.index].started {
            self.steps[self.index].started = true;
            self.turn_start_error = heading_error(heading, target_heading);
            self.config.turn_gains.kp = fabsf(self.config.turn_gains.kp);
            crate::log_debug!(
                "step {} turn start: target {} error {}",
                self.index,
                target_heading,
                self.turn_start_error
            );
        }

        if !self.steps[self.index].done {
            let cur_error = heading_error(heading, target_heading);
            let pid_out = self
                .turn_pid
                .turn_update(&self.config.turn_gains, 0.0, cur_error)
                .clamp(-1.0, 1.0);
            // curvature sign follows the configured turn direction
            let curvature = if turn_speed < 0.0 {
                -fabsf(pid_out)
            } else {
                fabsf(pid_out)
            };
            // speed ramps down with the remaining fraction of the turn
            let speed_factor = if self.turn_start_error == 0.0 {
                0.0
            } else {
                cur_error / self.turn_start_error
            };
            let mut ramp = turn_speed * speed_factor;
            if ramp < 0.0 && ramp > -MIN_TURN_RAMP {
                ramp = -MIN_TURN_RAMP;
            }
            if ramp > 0.0 && ramp < MIN_TURN_RAMP {
                ramp = MIN_TURN_RAMP;
            }
            // outside wheel always drives forward
            let speed = (-fabsf(ramp)).clamp(-1.0, 1.0);
            if fabsf(cur_error) < TURN_DONE_ERROR_DEG {
                self.steps[self.index].done = true;
            }
            ProfileOutput { speed, curvature }
        } else {
            crate::log_debug!("step {} turn done at heading {}", self.index, heading);
            self.index += 1;
            ProfileOutput::neutral()
        }
    }

    fn run_pause(&mut self, duration_ms: u64, timer: &dyn TimerInterface) -> ProfileOutput {
        if !self.steps[self.index].started {
            self.steps[self.index].started = true;
            self.pause_started_at_us = timer.now_us();
            crate::log_debug!("step {} pause start: {} ms", self.index, duration_ms);
        }

        let elapsed_ms = timer.now_us().saturating_sub(self.pause_started_at_us) / 1000;
        if elapsed_ms >= duration_ms {
            self.steps[self.index].done = true;
            crate::log_debug!("step {} pause done: {} ms elapsed", self.index, elapsed_ms);
            self.index += 1;
        }
        ProfileOutput::neutral()
    }

    /// Neighbor edge speed for continuous blending, if blending applies
    /// on that edge
    fn blend_speed(&self, neighbor: Option<usize>) -> Option<f32> {
        if !self.continuous {
            return None;
        }
        let step = self.steps.get(neighbor?)?;
        if step.is_pause() {
            None
        } else {
            Some(step.edge_speed())
        }
    }

    fn signed_speeds(&self, direction: Direction) -> (f32, f32) {
        match direction {
            Direction::Forward => (
                -fabsf(self.config.min_speed),
                -fabsf(self.config.max_speed),
            ),
            Direction::Reverse => (fabsf(self.config.min_speed), fabsf(self.config.max_speed)),
        }
    }

    fn push(&mut self, kind: StepKind) -> Result<usize> {
        self.steps
            .push(Step::new(kind))
            .map_err(|_| PlatformError::InvalidConfig)?;
        Ok(self.steps.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockTimer;

    const TICK_US: u64 = 20_000;

    fn engine() -> ProfileEngine {
        ProfileEngine::default()
    }

    // ========== Plan Building Tests ==========

    #[test]
    fn test_add_steps_returns_length() {
        let mut eng = engine();
        assert_eq!(eng.add_move(Direction::Forward, 8.0).unwrap(), 1);
        assert_eq!(eng.add_turn(90.0, 0.5).unwrap(), 2);
        assert_eq!(eng.add_pause(500).unwrap(), 3);
        assert_eq!(eng.add_curve(Direction::Forward, 4.0, 0.3).unwrap(), 4);
        assert_eq!(eng.plan_len(), 4);
    }

    #[test]
    fn test_forward_move_negative_speeds() {
        let mut eng = engine();
        eng.add_move(Direction::Forward, 8.0).unwrap();
        match eng.step(0).unwrap().kind {
            StepKind::Move {
                min_speed,
                max_speed,
                ..
            } => {
                assert_eq!(min_speed, -0.35, "got {}", min_speed);
                assert_eq!(max_speed, -1.0, "got {}", max_speed);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_reverse_move_positive_speeds() {
        let mut eng = engine();
        eng.add_move(Direction::Reverse, 8.0).unwrap();
        match eng.step(0).unwrap().kind {
            StepKind::Move {
                min_speed,
                max_speed,
                ..
            } => {
                assert!(min_speed > 0.0 && max_speed > 0.0);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_plan_capacity_overflow() {
        let mut eng = engine();
        for _ in 0..PLAN_CAPACITY {
            eng.add_pause(10).unwrap();
        }
        assert_eq!(
            eng.add_pause(10),
            Err(PlatformError::InvalidConfig),
            "17th step must be rejected"
        );
    }

    #[test]
    fn test_clear_profile_empties_plan() {
        let mut eng = engine();
        eng.add_move(Direction::Forward, 8.0).unwrap();
        eng.loaded = true;
        eng.clear_profile();
        assert_eq!(eng.plan_len(), 0);
        assert!(!eng.loaded);
        assert_eq!(eng.current_index(), 0);
    }

    // ========== Empty Plan Tests ==========

    #[test]
    fn test_empty_plan_neutral_and_completed() {
        let mut eng = engine();
        let timer = MockTimer::new();
        let out = eng.execute(0.0, 0.0, &timer);
        assert_eq!(out, ProfileOutput::neutral());
        assert!(eng.is_completed());
    }

    // ========== Move Tests ==========

    #[test]
    fn test_single_move_completes() {
        let mut eng = engine();
        let mut timer = MockTimer::new();
        eng.add_move(Direction::Forward, 8.0).unwrap();
        eng.loaded = true;

        let mut distance = 0.0;
        let mut ticks = 0;
        while !eng.is_completed() {
            let out = eng.execute(0.0, distance, &timer);
            assert!((-1.0..=1.0).contains(&out.speed));
            assert!((-1.0..=1.0).contains(&out.curvature));
            distance = (distance + 0.05).min(8.0);
            timer.advance_us(TICK_US);
            ticks += 1;
            assert!(ticks < 1000, "move never completed");
        }

        let out = eng.execute(0.0, distance, &timer);
        assert_eq!(out, ProfileOutput::neutral());
        assert!(eng.is_completed());
        assert_eq!(eng.current_index(), 1);
    }

    #[test]
    fn test_move_measures_from_start_distance() {
        let mut eng = engine();
        let mut timer = MockTimer::new();
        eng.add_move(Direction::Forward, 2.0).unwrap();
        eng.loaded = true;

        // odometry does not start at zero
        let mut distance = 100.0;
        let mut ticks = 0;
        while !eng.is_completed() {
            eng.execute(0.0, distance, &timer);
            distance = (distance + 0.05).min(102.0);
            timer.advance_us(TICK_US);
            ticks += 1;
            assert!(ticks < 1000, "move never completed");
        }
    }

    #[test]
    fn test_move_speed_is_forward() {
        let mut eng = engine();
        let timer = MockTimer::new();
        eng.add_move(Direction::Forward, 8.0).unwrap();
        eng.loaded = true;

        let out = eng.execute(0.0, 0.0, &timer);
        assert_eq!(out.speed, -0.35, "got {}", out.speed);
    }

    #[test]
    fn test_move_steers_back_toward_start_heading() {
        let mut eng = engine();
        let mut timer = MockTimer::new();
        eng.add_move(Direction::Forward, 8.0).unwrap();
        eng.loaded = true;

        eng.execute(0.0, 0.0, &timer);
        timer.advance_us(TICK_US);
        // drifted 10 degrees right of the start heading
        let out = eng.execute(10.0, 1.0, &timer);
        assert!(out.curvature < 0.0, "must steer left, got {}", out.curvature);
    }

    #[test]
    fn test_move_flips_steer_gain_sign() {
        let mut eng = engine();
        let timer = MockTimer::new();
        eng.add_move(Direction::Forward, 8.0).unwrap();
        eng.loaded = true;
        eng.execute(0.0, 0.0, &timer);
        assert!(eng.config.steer_gains.kp < 0.0, "forward leg keeps kp negative");

        let mut eng = engine();
        eng.add_move(Direction::Reverse, 8.0).unwrap();
        eng.loaded = true;
        eng.execute(0.0, 0.0, &timer);
        assert!(eng.config.steer_gains.kp > 0.0, "reverse leg flips kp positive");
    }

    // ========== Curve Tests ==========

    #[test]
    fn test_curve_uses_fixed_ratio() {
        let mut eng = engine();
        let mut timer = MockTimer::new();
        eng.add_curve(Direction::Forward, 8.0, -0.4).unwrap();
        eng.loaded = true;

        eng.execute(0.0, 0.0, &timer);
        timer.advance_us(TICK_US);
        // heading drift must not affect a curve's curvature
        let out = eng.execute(25.0, 1.0, &timer);
        assert_eq!(out.curvature, -0.4, "got {}", out.curvature);
    }

    // ========== Turn Tests ==========

    #[test]
    fn test_turn_curvature_sign_follows_direction() {
        let mut eng = engine();
        let timer = MockTimer::new();
        eng.add_turn(90.0, 0.5).unwrap();
        eng.loaded = true;

        let out = eng.execute(0.0, 0.0, &timer);
        assert!(out.curvature > 0.0, "right turn, got {}", out.curvature);

        let mut eng = engine();
        eng.add_turn(315.0, -0.5).unwrap();
        eng.loaded = true;
        let out = eng.execute(0.0, 0.0, &timer);
        assert!(out.curvature < 0.0, "left turn, got {}", out.curvature);
    }

    #[test]
    fn test_turn_speed_always_forward() {
        let mut eng = engine();
        let timer = MockTimer::new();
        eng.add_turn(90.0, 0.5).unwrap();
        eng.loaded = true;

        let out = eng.execute(0.0, 0.0, &timer);
        assert_eq!(out.speed, -0.5, "got {}", out.speed);
    }

    #[test]
    fn test_turn_ramp_floor() {
        let mut eng = engine();
        let mut timer = MockTimer::new();
        eng.add_turn(90.0, 0.5).unwrap();
        eng.loaded = true;

        eng.execute(0.0, 0.0, &timer);
        timer.advance_us(TICK_US);
        // 5 degrees remaining: raw ramp would be 0.028, floored to 0.25
        let out = eng.execute(85.0, 0.0, &timer);
        assert_eq!(out.speed, -0.25, "got {}", out.speed);
    }

    #[test]
    fn test_turn_completes_within_tolerance() {
        let mut eng = engine();
        let mut timer = MockTimer::new();
        eng.add_turn(90.0, 0.5).unwrap();
        eng.loaded = true;

        for heading in [0.0, 30.0, 60.0, 85.0] {
            eng.execute(heading, 0.0, &timer);
            timer.advance_us(TICK_US);
            assert!(!eng.is_completed());
        }

        // error below 2 degrees marks the step done
        eng.execute(89.0, 0.0, &timer);
        assert!(eng.step(0).unwrap().done);
        timer.advance_us(TICK_US);

        let out = eng.execute(89.0, 0.0, &timer);
        assert_eq!(out, ProfileOutput::neutral());
        assert!(eng.is_completed());
    }

    #[test]
    fn test_turn_zero_start_error_completes_first_tick() {
        let mut eng = engine();
        let timer = MockTimer::new();
        eng.add_turn(90.0, 0.5).unwrap();
        eng.loaded = true;

        let out = eng.execute(90.0, 0.0, &timer);
        assert_eq!(out.speed, 0.0, "got {}", out.speed);
        assert!(eng.step(0).unwrap().done);
    }

    // ========== Pause Tests ==========

    #[test]
    fn test_pause_waits_full_duration() {
        let mut eng = engine();
        let mut timer = MockTimer::new();
        eng.add_pause(500).unwrap();
        eng.loaded = true;

        let out = eng.execute(0.0, 0.0, &timer);
        assert_eq!(out, ProfileOutput::neutral());
        assert!(!eng.is_completed());

        timer.advance_ms(499);
        eng.execute(0.0, 0.0, &timer);
        assert!(!eng.is_completed());

        timer.advance_ms(1);
        let out = eng.execute(0.0, 0.0, &timer);
        assert_eq!(out, ProfileOutput::neutral());
        assert!(eng.is_completed());
    }

    // ========== Sequencing Tests ==========

    #[test]
    fn test_index_advances_one_step_at_a_time() {
        let mut eng = engine();
        let mut timer = MockTimer::new();
        eng.add_pause(10).unwrap();
        eng.add_pause(10).unwrap();
        eng.loaded = true;

        eng.execute(0.0, 0.0, &timer);
        assert_eq!(eng.current_index(), 0);
        timer.advance_ms(10);
        eng.execute(0.0, 0.0, &timer);
        assert_eq!(eng.current_index(), 1);
        assert!(!eng.is_completed());
        eng.execute(0.0, 0.0, &timer);
        timer.advance_ms(10);
        eng.execute(0.0, 0.0, &timer);
        assert_eq!(eng.current_index(), 2);
        assert!(eng.is_completed());
    }

    #[test]
    fn test_continuous_blend_across_moves() {
        let mut eng = engine();
        let mut timer = MockTimer::new();
        eng.add_move(Direction::Reverse, 8.0).unwrap();
        eng.add_move(Direction::Reverse, 8.0).unwrap();
        eng.continuous = true;
        eng.loaded = true;

        // run the first move to completion
        let mut distance = 0.0;
        let mut ticks = 0;
        while eng.current_index() == 0 {
            eng.execute(0.0, distance, &timer);
            distance = (distance + 0.05).min(8.0);
            timer.advance_us(TICK_US);
            ticks += 1;
            assert!(ticks < 1000, "first move never completed");
        }

        // second move starts floored at the previous leg's max speed
        let out = eng.execute(0.0, distance, &timer);
        assert_eq!(out.speed, 1.0, "got {}", out.speed);
    }

    #[test]
    fn test_initialize_keeps_plan_resets_execution() {
        let mut eng = engine();
        let mut timer = MockTimer::new();
        eng.add_pause(10).unwrap();
        eng.loaded = true;
        eng.execute(0.0, 0.0, &timer);
        timer.advance_ms(10);
        eng.execute(0.0, 0.0, &timer);
        assert!(eng.is_completed());

        eng.initialize();
        assert_eq!(eng.plan_len(), 1);
        assert_eq!(eng.current_index(), 0);
        assert!(!eng.is_completed());
        assert!(!eng.loaded);
    }
}
